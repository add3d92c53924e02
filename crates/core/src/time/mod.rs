pub mod report_period;
