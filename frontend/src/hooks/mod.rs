pub mod use_schedules;
