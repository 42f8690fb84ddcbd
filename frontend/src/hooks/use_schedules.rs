use shared::{normalize, CanonicalSchedule, NormalizeReport, ScheduleQuery};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;

/// View state backing the calendar: the canonical schedule set plus the
/// fetch/normalize status around it. Replaced wholesale on every refetch.
#[derive(Clone, PartialEq)]
pub struct ScheduleState {
    pub schedules: Vec<CanonicalSchedule>,
    pub report: NormalizeReport,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct UseSchedulesResult {
    pub state: ScheduleState,
    pub refresh: Callback<()>,
    pub append: Callback<CanonicalSchedule>,
}

#[hook]
pub fn use_schedules(api_client: &ApiClient) -> UseSchedulesResult {
    let schedules = use_state(Vec::<CanonicalSchedule>::new);
    let report = use_state(NormalizeReport::default);
    let loading = use_state(|| true);
    let error = use_state(|| Option::<String>::None);
    // Ticket counter for request sequencing: a fetch that is no longer the
    // latest when it completes must not overwrite newer state.
    let fetch_ticket = use_mut_ref(|| 0u64);

    let refresh = {
        let api_client = api_client.clone();
        let schedules = schedules.clone();
        let report = report.clone();
        let loading = loading.clone();
        let error = error.clone();
        let fetch_ticket = fetch_ticket.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let schedules = schedules.clone();
            let report = report.clone();
            let loading = loading.clone();
            let error = error.clone();
            let fetch_ticket = fetch_ticket.clone();

            let ticket = {
                let mut current = fetch_ticket.borrow_mut();
                *current += 1;
                *current
            };

            loading.set(true);
            error.set(None);

            spawn_local(async move {
                let result = api_client.get_schedules(&ScheduleQuery::default()).await;
                if *fetch_ticket.borrow() != ticket {
                    // A newer fetch superseded this one; drop the response.
                    return;
                }

                match result {
                    Ok(response) => {
                        let raw_count = response.schedules.len();
                        let outcome = normalize(&response.schedules);
                        gloo::console::debug!(format!(
                            "Normalized {} of {} schedule records",
                            outcome.report.accepted, raw_count
                        ));
                        if outcome.schedules.is_empty() && raw_count > 0 {
                            error.set(Some(
                                "All schedule data was invalid. Please check the database."
                                    .to_string(),
                            ));
                        }
                        schedules.set(outcome.schedules);
                        report.set(outcome.report);
                    }
                    Err(message) => {
                        gloo::console::error!("Failed to fetch schedules:", message.clone());
                        error.set(Some(format!("Failed to load schedules: {}", message)));
                        schedules.set(Vec::new());
                        report.set(NormalizeReport::default());
                    }
                }
                loading.set(false);
            });
        })
    };

    // Optimistic append of a just-created schedule; the follow-up refetch
    // replaces the whole set anyway.
    let append = {
        let schedules = schedules.clone();
        use_callback((), move |schedule: CanonicalSchedule, _| {
            let mut next = (*schedules).clone();
            next.push(schedule);
            schedules.set(next);
        })
    };

    // Initial load on mount.
    use_effect_with((), {
        let refresh = refresh.clone();
        move |_| {
            refresh.emit(());
            || ()
        }
    });

    let state = ScheduleState {
        schedules: (*schedules).clone(),
        report: (*report).clone(),
        loading: *loading,
        error: (*error).clone(),
    };

    UseSchedulesResult {
        state,
        refresh,
        append,
    }
}
