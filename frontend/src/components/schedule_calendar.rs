use chrono::{Datelike, NaiveDate};
use shared::calendar::{
    bucketize, format_date_long, format_duration, format_time_12h, month_grid, month_name,
    schedules_on_day, shift_month, sorted_by_departure, MonthDirection, TIMELINE_SLOT_HOURS,
};
use shared::{normalize, ScheduleStatus};
use yew::prelude::*;

use crate::components::add_schedule_modal::AddScheduleModal;
use crate::hooks::use_schedules::use_schedules;
use crate::services::api::ApiClient;
use crate::services::date_utils::{is_today, today_local};

/// CSS badge class for a schedule status. Unrecognized statuses get the
/// neutral style instead of breaking the layout.
fn status_badge_class(status: &ScheduleStatus) -> &'static str {
    match status {
        ScheduleStatus::Scheduled => "status-badge scheduled",
        ScheduleStatus::InProgress => "status-badge in-progress",
        ScheduleStatus::Completed => "status-badge completed",
        ScheduleStatus::Cancelled => "status-badge cancelled",
        ScheduleStatus::Delayed => "status-badge delayed",
        ScheduleStatus::Active => "status-badge active",
        ScheduleStatus::Other(_) => "status-badge neutral",
    }
}

#[function_component(ScheduleCalendar)]
pub fn schedule_calendar() -> Html {
    let api_client = ApiClient::new();
    let current_date = use_state(today_local);
    let selected_date = use_state(today_local);
    let modal_open = use_state(|| false);

    let schedules = use_schedules(&api_client);
    let state = schedules.state;
    let refresh = schedules.refresh;
    let append = schedules.append;

    // Month navigation refetches; the new response replaces the whole set.
    let prev_month = {
        let current_date = current_date.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| {
            current_date.set(shift_month(*current_date, MonthDirection::Previous));
            refresh.emit(());
        })
    };

    let next_month = {
        let current_date = current_date.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| {
            current_date.set(shift_month(*current_date, MonthDirection::Next));
            refresh.emit(());
        })
    };

    let go_to_today = {
        let current_date = current_date.clone();
        let selected_date = selected_date.clone();
        Callback::from(move |_: MouseEvent| {
            let today = today_local();
            current_date.set(today);
            selected_date.set(today);
        })
    };

    let on_retry = {
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    let open_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: MouseEvent| modal_open.set(true))
    };

    let close_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |_| modal_open.set(false))
    };

    let on_schedule_added = {
        let refresh = refresh.clone();
        let append = append.clone();
        let modal_open = modal_open.clone();
        Callback::from(move |created: serde_json::Value| {
            // Optimistic append of the created record, then reconcile with a
            // full refetch.
            let outcome = normalize(std::slice::from_ref(&created));
            if let Some(schedule) = outcome.schedules.into_iter().next() {
                append.emit(schedule);
            }
            modal_open.set(false);
            refresh.emit(());
        })
    };

    let year = current_date.year();
    let month = current_date.month();
    let grid = month_grid(year, month);
    let selected = *selected_date;

    let day_schedules = sorted_by_departure(&schedules_on_day(&state.schedules, selected));
    let buckets = bucketize(&day_schedules, &TIMELINE_SLOT_HOURS);

    html! {
        <div class="schedule-calendar">
            <div class="calendar-panel">
                <div class="calendar-header">
                    <div>
                        <h2 class="calendar-title">
                            {format!("{} {}", month_name(month), year)}
                        </h2>
                        <p class="calendar-subtitle">
                            {format!(
                                "{} total schedule{}",
                                state.schedules.len(),
                                if state.schedules.len() == 1 { "" } else { "s" }
                            )}
                        </p>
                    </div>
                    <div class="calendar-nav">
                        <button class="calendar-nav-btn" onclick={prev_month} title="Previous month">
                            {"‹"}
                        </button>
                        <button class="calendar-nav-btn today" onclick={go_to_today} title="Go to current month">
                            {"Today"}
                        </button>
                        <button class="calendar-nav-btn" onclick={next_month} title="Next month">
                            {"›"}
                        </button>
                        <button class="btn btn-primary" onclick={open_modal}>
                            {"Add Schedule"}
                        </button>
                    </div>
                </div>

                <div class="calendar-weekdays">
                    <div class="weekday">{"Sun"}</div>
                    <div class="weekday">{"Mon"}</div>
                    <div class="weekday">{"Tue"}</div>
                    <div class="weekday">{"Wed"}</div>
                    <div class="weekday">{"Thu"}</div>
                    <div class="weekday">{"Fri"}</div>
                    <div class="weekday">{"Sat"}</div>
                </div>

                <div class="calendar-grid">
                    {for grid.iter().map(|cell| match cell {
                        None => html! { <div class="calendar-day empty"></div> },
                        Some(date) => {
                            let date = *date;
                            let count = schedules_on_day(&state.schedules, date).len();
                            let selected_day = date == selected;
                            let today = is_today(date);

                            let mut class = String::from("calendar-day");
                            if today {
                                class.push_str(" today");
                            }
                            if selected_day {
                                class.push_str(" selected");
                            }
                            if count > 0 {
                                class.push_str(" has-schedules");
                            }

                            let onclick = {
                                let selected_date = selected_date.clone();
                                Callback::from(move |_: MouseEvent| selected_date.set(date))
                            };

                            html! {
                                <button class={class} {onclick}
                                    title={format!(
                                        "{} - {} schedule{}",
                                        format_date_long(date),
                                        count,
                                        if count == 1 { "" } else { "s" }
                                    )}
                                >
                                    <span class="day-number">{date.day()}</span>
                                    {if count > 0 {
                                        html! {
                                            <span class="day-indicator">
                                                <span class="day-dot"></span>
                                                {if count > 1 {
                                                    html! { <span class="day-count">{count}</span> }
                                                } else { html! {} }}
                                            </span>
                                        }
                                    } else { html! {} }}
                                </button>
                            }
                        }
                    })}
                </div>
            </div>

            <div class="day-panel">
                <div class="day-panel-header">
                    <h3>{format_date_long(selected)}</h3>
                    <span class="day-panel-count">
                        {format!(
                            "{} schedule{}",
                            day_schedules.len(),
                            if day_schedules.len() == 1 { "" } else { "s" }
                        )}
                    </span>
                </div>

                {if state.loading {
                    html! { <div class="loading">{"Loading schedules..."}</div> }
                } else if let Some(error) = state.error.as_ref() {
                    html! {
                        <div class="error-state">
                            <p class="error-text">{error}</p>
                            <button class="retry-btn" onclick={on_retry}>{"Try again"}</button>
                        </div>
                    }
                } else if day_schedules.is_empty() {
                    html! {
                        <div class="empty-state">
                            <p>{format!("No schedules for {}", format_date_long(selected))}</p>
                            <p class="empty-hint">{"This date is available for new schedules"}</p>
                        </div>
                    }
                } else {
                    html! {
                        <div class="schedule-list">
                            {for day_schedules.iter().map(|schedule| html! {
                                <div class="schedule-card" key={schedule.id.clone()}>
                                    <div class="schedule-times">
                                        <span class="time">{format_time_12h(schedule.departure)}</span>
                                        <span class="arrow">{"→"}</span>
                                        <span class="time">{format_time_12h(schedule.arrival)}</span>
                                        <span class="duration">
                                            {format_duration(schedule.departure, schedule.arrival)}
                                        </span>
                                        <span class={status_badge_class(&schedule.status)}>
                                            {schedule.status.label()}
                                        </span>
                                    </div>
                                    <div class="schedule-meta">
                                        <div class="meta-item">
                                            <span class="meta-label">{"Bus"}</span>
                                            <span class="meta-value">{schedule.bus_label.clone()}</span>
                                        </div>
                                        <div class="meta-item">
                                            <span class="meta-label">{"Route"}</span>
                                            <span class="meta-value">{schedule.route_label.clone()}</span>
                                        </div>
                                        <div class="meta-item">
                                            <span class="meta-label">{"Passengers"}</span>
                                            <span class="meta-value">{schedule.passenger_count}</span>
                                        </div>
                                    </div>
                                </div>
                            })}
                        </div>
                    }
                }}
            </div>

            <div class="timeline-panel">
                <h3>{"24-Hour Timeline View"}</h3>
                <div class="timeline-strip">
                    {for TIMELINE_SLOT_HOURS.iter().map(|hour| {
                        let slot = buckets.get(hour).map(Vec::as_slice).unwrap_or(&[]);
                        html! {
                            <div class="timeline-slot">
                                <div class="slot-label">{format!("{:02}:00", hour)}</div>
                                <div class={if slot.is_empty() { "slot-box" } else { "slot-box occupied" }}>
                                    {if let Some(first) = slot.first() {
                                        html! {
                                            <div class="slot-content">
                                                <div class="slot-bus">{first.bus_label.clone()}</div>
                                                {if slot.len() > 1 {
                                                    html! {
                                                        <div class="slot-more">
                                                            {format!("+{} more", slot.len() - 1)}
                                                        </div>
                                                    }
                                                } else { html! {} }}
                                            </div>
                                        }
                                    } else { html! {} }}
                                </div>
                            </div>
                        }
                    })}
                </div>
            </div>

            <AddScheduleModal
                open={*modal_open}
                selected_date={selected}
                on_close={close_modal}
                on_added={on_schedule_added}
            />
        </div>
    }
}
