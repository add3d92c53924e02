pub mod eastmoney;
pub mod types;
