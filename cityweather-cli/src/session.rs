//! Interactive lookup loop: the terminal stand-in for the original window.

use anyhow::Context;
use chrono::Local;
use cityweather_core::{DisplayState, DisplayUnit, WeatherProvider, run_query};
use inquire::{Select, Text};
use std::fmt;

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Lookup,
    ChangeUnit,
    Quit,
}

impl Action {
    const ALL: [Action; 3] = [Action::Lookup, Action::ChangeUnit, Action::Quit];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Lookup => "Get weather",
            Action::ChangeUnit => "Change unit",
            Action::Quit => "Quit",
        })
    }
}

/// State that lives for the whole session; each lookup only replaces `display`.
#[derive(Debug, Default)]
struct Session {
    unit: DisplayUnit,
    display: DisplayState,
}

pub async fn run(provider: &dyn WeatherProvider, unit: DisplayUnit) -> anyhow::Result<()> {
    let mut session = Session { unit, ..Default::default() };

    loop {
        let action = Select::new(&format!("[{}]", session.unit), Action::ALL.to_vec())
            .prompt()
            .context("Prompt aborted")?;

        match action {
            Action::Lookup => {
                let city = Text::new("Enter city name:").prompt().context("Prompt aborted")?;
                let outcome = run_query(provider, city.trim(), session.unit).await;
                session.display.apply(outcome);
                print_display(&session.display);
            }
            Action::ChangeUnit => {
                let units = DisplayUnit::all().to_vec();
                let cursor = units.iter().position(|u| *u == session.unit).unwrap_or(0);
                session.unit = Select::new("Unit:", units)
                    .with_starting_cursor(cursor)
                    .prompt()
                    .context("Prompt aborted")?;
                if session.display.has_weather() {
                    session.display.change_unit(session.unit);
                    print_display(&session.display);
                }
            }
            Action::Quit => return Ok(()),
        }
    }
}

fn print_display(state: &DisplayState) {
    println!();
    print!("{}", render::panel(state));
    if let Some(chart) = &state.chart {
        println!();
        print!("{}", render::chart(chart));
    }
    println!("(shown at {})", Local::now().format("%H:%M:%S"));
    println!();
}
