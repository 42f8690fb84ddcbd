use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::schedule_calendar::ScheduleCalendar;

#[function_component(App)]
fn app() -> Html {
    html! {
        <>
            <header class="header">
                <div class="container">
                    <h1>{"Transit Schedule Console"}</h1>
                    <p class="subtitle">
                        {"Manage bus schedules across 365 days with 24-hour coverage"}
                    </p>
                </div>
            </header>

            <main class="main">
                <div class="container">
                    <ScheduleCalendar />
                </div>
            </main>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
