use chrono::NaiveDate;
use shared::CreateScheduleRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct AddScheduleModalProps {
    pub open: bool,
    /// Day the schedule is created for; times are entered as HH:MM and
    /// combined with this date into naive local timestamps.
    pub selected_date: NaiveDate,
    pub on_close: Callback<()>,
    /// Fires with the raw record the backend returned for the new schedule.
    pub on_added: Callback<serde_json::Value>,
}

#[function_component(AddScheduleModal)]
pub fn add_schedule_modal(props: &AddScheduleModalProps) -> Html {
    let route_id = use_state(String::new);
    let bus_id = use_state(String::new);
    let departure_time = use_state(String::new);
    let arrival_time = use_state(String::new);
    let frequency = use_state(|| "once".to_string());
    let submitting = use_state(|| false);
    let form_error = use_state(|| Option::<String>::None);

    let on_route_change = {
        let route_id = route_id.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            route_id.set(input.value());
        })
    };

    let on_bus_change = {
        let bus_id = bus_id.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            bus_id.set(input.value());
        })
    };

    let on_departure_change = {
        let departure_time = departure_time.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            departure_time.set(input.value());
        })
    };

    let on_arrival_change = {
        let arrival_time = arrival_time.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            arrival_time.set(input.value());
        })
    };

    let on_frequency_change = {
        let frequency = frequency.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            frequency.set(select.value());
        })
    };

    let on_submit = {
        let route_id = route_id.clone();
        let bus_id = bus_id.clone();
        let departure_time = departure_time.clone();
        let arrival_time = arrival_time.clone();
        let frequency = frequency.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();
        let on_added = props.on_added.clone();
        let selected_date = props.selected_date;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            if (*route_id).trim().is_empty() || (*bus_id).trim().is_empty() {
                form_error.set(Some("Route and bus are required.".to_string()));
                return;
            }
            if (*departure_time).is_empty() || (*arrival_time).is_empty() {
                form_error.set(Some("Departure and arrival times are required.".to_string()));
                return;
            }
            // HH:MM strings compare correctly as text.
            if *departure_time >= *arrival_time {
                form_error.set(Some("Arrival must be after departure.".to_string()));
                return;
            }

            let date = selected_date.to_string();
            let request = CreateScheduleRequest {
                route_id: (*route_id).trim().to_string(),
                bus_id: (*bus_id).trim().to_string(),
                date: date.clone(),
                departure_time: format!("{}T{}:00", date, *departure_time),
                arrival_time: format!("{}T{}:00", date, *arrival_time),
                frequency: Some((*frequency).clone()).filter(|f| !f.is_empty()),
                status: Some("scheduled".to_string()),
            };

            form_error.set(None);
            submitting.set(true);

            let api_client = ApiClient::new();
            let route_id = route_id.clone();
            let bus_id = bus_id.clone();
            let departure_time = departure_time.clone();
            let arrival_time = arrival_time.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();
            let on_added = on_added.clone();

            spawn_local(async move {
                match api_client.create_schedule(&request).await {
                    Ok(created) => {
                        route_id.set(String::new());
                        bus_id.set(String::new());
                        departure_time.set(String::new());
                        arrival_time.set(String::new());
                        on_added.emit(created);
                    }
                    Err(message) => {
                        form_error.set(Some(message));
                    }
                }
                submitting.set(false);
            });
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    if !props.open {
        return html! {};
    }

    html! {
        <div class="modal-overlay">
            <div class="modal">
                <div class="modal-header">
                    <h3>{"Add Schedule"}</h3>
                    <span class="modal-date">
                        {format!("for {}", props.selected_date.format("%A, %B %-d"))}
                    </span>
                </div>

                {if let Some(error) = (*form_error).as_ref() {
                    html! { <div class="form-message error">{error}</div> }
                } else { html! {} }}

                <form class="add-schedule-form" onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="bus-id">{"Bus"}</label>
                        <input
                            type="text"
                            id="bus-id"
                            placeholder="Bus number or id..."
                            value={(*bus_id).clone()}
                            onchange={on_bus_change}
                            disabled={*submitting}
                        />
                    </div>

                    <div class="form-group">
                        <label for="route-id">{"Route"}</label>
                        <input
                            type="text"
                            id="route-id"
                            placeholder="Route name or id..."
                            value={(*route_id).clone()}
                            onchange={on_route_change}
                            disabled={*submitting}
                        />
                    </div>

                    <div class="form-row">
                        <div class="form-group">
                            <label for="departure-time">{"Departure"}</label>
                            <input
                                type="time"
                                id="departure-time"
                                value={(*departure_time).clone()}
                                onchange={on_departure_change}
                                disabled={*submitting}
                            />
                        </div>
                        <div class="form-group">
                            <label for="arrival-time">{"Arrival"}</label>
                            <input
                                type="time"
                                id="arrival-time"
                                value={(*arrival_time).clone()}
                                onchange={on_arrival_change}
                                disabled={*submitting}
                            />
                        </div>
                    </div>

                    <div class="form-group">
                        <label for="frequency">{"Frequency"}</label>
                        <select
                            id="frequency"
                            onchange={on_frequency_change}
                            disabled={*submitting}
                        >
                            <option value="once" selected={*frequency == "once"}>{"Once"}</option>
                            <option value="daily" selected={*frequency == "daily"}>{"Daily"}</option>
                            <option value="weekly" selected={*frequency == "weekly"}>{"Weekly"}</option>
                        </select>
                    </div>

                    <div class="modal-actions">
                        <button
                            type="button"
                            class="btn btn-secondary"
                            onclick={on_cancel}
                            disabled={*submitting}
                        >
                            {"Cancel"}
                        </button>
                        <button type="submit" class="btn btn-primary" disabled={*submitting}>
                            {if *submitting { "Adding Schedule..." } else { "Add Schedule" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
