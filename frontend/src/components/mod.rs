pub mod add_schedule_modal;
pub mod schedule_calendar;
