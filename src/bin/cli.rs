use chrono::{Datelike, NaiveDate};
use pickup_calendar::time_format::{format_time, parse_date, parse_datetime, parse_time};
use pickup_calendar::{
    BakeryCalendar, CalendarOverride, PickupRules, ProductCategory, ResolvedDay,
    load_calendar_from_json, load_overrides_from_csv, project_month, project_week,
    save_calendar_to_json, save_overrides_to_csv,
};
use std::io::{self, Write};

fn render_day(day: &ResolvedDay) -> String {
    let hours = match (day.open_time, day.close_time) {
        (Some(open), Some(close)) if !day.is_closed => {
            format!("{}-{}", format_time(open), format_time(close))
        }
        _ => "closed".to_string(),
    };
    let mut line = format!("{} {} {:<11}", day.date, day.date.weekday(), hours);
    if day.is_exception {
        line.push_str(" [exception]");
    }
    if let Some(cutoff) = day.cutoff_date {
        line.push_str(&format!(" cutoff={cutoff}"));
    }
    if let Some(reason) = &day.reason {
        line.push(' ');
        line.push_str(reason);
    }
    line
}

fn render_days(days: &[ResolvedDay]) -> String {
    days.iter().map(render_day).collect::<Vec<_>>().join("\n")
}

fn print_help() {
    println!(
        "Commands:\n  help                                     Show this help\n  week <YYYY-MM-DD>                        Show the Monday-Sunday week containing the date\n  month <year> <month>                     Show the month grid\n  earliest <category> <YYYY-MM-DDTHH:MM>   Earliest pickup date for an order placed then\n  check <category> <date> <datetime>       Validate a requested pickup date\n  close <date> [reason...]                 Mark a date closed\n  open <date> <HH:MM> <HH:MM> [cutoff]     Open a date, optionally with an order cutoff date\n  reset <date>                             Remove the override for a date\n  save <json|csv> <path>                   Save the calendar (csv: overrides only)\n  load <json|csv> <path>                   Load the calendar (csv: overrides only)\n  quit|exit                                Exit"
    );
}

fn parse_date_arg(arg: Option<&str>) -> Option<NaiveDate> {
    arg.and_then(|raw| parse_date(raw).ok())
}

fn main() {
    let mut calendar = BakeryCalendar::default();
    let rules = PickupRules::default();

    println!("Pickup Calendar (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };
        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "week" => match parse_date_arg(parts.next()) {
                Some(date) => println!("{}", render_days(&project_week(date, &calendar))),
                None => println!("Usage: week <YYYY-MM-DD>"),
            },
            "month" => {
                let year = parts.next().and_then(|s| s.parse::<i32>().ok());
                let month = parts.next().and_then(|s| s.parse::<u32>().ok());
                match (year, month) {
                    (Some(year), Some(month)) => match project_month(year, month, &calendar) {
                        Ok(grid) => {
                            let in_month: Vec<ResolvedDay> = grid
                                .days
                                .iter()
                                .filter(|day| grid.contains(day.date))
                                .cloned()
                                .collect();
                            let open = calendar.count_open_days(
                                in_month.first().map(|d| d.date).unwrap_or_default(),
                                in_month.last().map(|d| d.date).unwrap_or_default(),
                            );
                            println!("{}", render_days(&in_month));
                            println!("Open days: {open}");
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    _ => println!("Usage: month <year> <month>"),
                }
            }
            "earliest" => {
                let category = parts.next().map(ProductCategory::from_name);
                let now = parts.next().and_then(|s| parse_datetime(s).ok());
                match (category, now) {
                    (Some(category), Some(now)) => {
                        let quote = rules.quote(&calendar, category, now);
                        println!(
                            "Earliest pickup for {}: {} (base minimum {})",
                            quote.category, quote.earliest_date, quote.base_minimum_date
                        );
                    }
                    _ => println!("Usage: earliest <category> <YYYY-MM-DDTHH:MM>"),
                }
            }
            "check" => {
                let category = parts.next().map(ProductCategory::from_name);
                let date = parse_date_arg(parts.next());
                let now = parts.next().and_then(|s| parse_datetime(s).ok());
                match (category, date, now) {
                    (Some(category), Some(date), Some(now)) => {
                        match rules.validate_pickup_date(&calendar, category, date, now) {
                            Ok(()) => println!("Pickup on {date} accepted."),
                            Err(e) => println!("Rejected: {e}"),
                        }
                    }
                    _ => println!("Usage: check <category> <YYYY-MM-DD> <YYYY-MM-DDTHH:MM>"),
                }
            }
            "close" => match parse_date_arg(parts.next()) {
                Some(date) => {
                    let reason = parts.collect::<Vec<_>>().join(" ");
                    calendar.upsert_override(CalendarOverride::closed(date).with_reason(reason));
                    println!("{}", render_day(&calendar.resolve(date)));
                }
                None => println!("Usage: close <YYYY-MM-DD> [reason...]"),
            },
            "open" => {
                let date = parse_date_arg(parts.next());
                let open = parts.next().and_then(|s| parse_time(s).ok());
                let close = parts.next().and_then(|s| parse_time(s).ok());
                let cutoff = parts.next().map(parse_date);
                match (date, open, close, cutoff) {
                    (_, _, _, Some(Err(e))) => println!("Error: {e}"),
                    (Some(date), Some(open), Some(close), cutoff) => {
                        let mut ov = CalendarOverride::open(date, open, close);
                        if let Some(Ok(cutoff)) = cutoff {
                            ov = ov.with_cutoff(cutoff);
                        }
                        if ov.cutoff_date.is_none() && ov.matches_default(calendar.schedule()) {
                            println!("Note: {date} matches the default schedule.");
                        }
                        calendar.upsert_override(ov);
                        println!("{}", render_day(&calendar.resolve(date)));
                    }
                    _ => println!("Usage: open <YYYY-MM-DD> <HH:MM> <HH:MM> [cutoff YYYY-MM-DD]"),
                }
            }
            "reset" => match parse_date_arg(parts.next()) {
                Some(date) => match calendar.remove_override(date) {
                    Some(_) => println!("Override for {date} removed."),
                    None => println!("No override for {date}."),
                },
                None => println!("Usage: reset <YYYY-MM-DD>"),
            },
            "save" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match save_calendar_to_json(&calendar, path) {
                    Ok(()) => println!("Calendar saved to {path}."),
                    Err(e) => println!("Error: {e}"),
                },
                (Some("csv"), Some(path)) => match save_overrides_to_csv(calendar.overrides(), path)
                {
                    Ok(()) => println!("Overrides saved to {path}."),
                    Err(e) => println!("Error: {e}"),
                },
                _ => println!("Usage: save <json|csv> <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_calendar_from_json(path) {
                    Ok(loaded) => {
                        calendar = loaded;
                        println!("Calendar loaded from {path}.");
                    }
                    Err(e) => println!("Error: {e}"),
                },
                (Some("csv"), Some(path)) => match load_overrides_from_csv(path) {
                    Ok(overrides) => {
                        calendar = BakeryCalendar::new(calendar.schedule().clone(), overrides);
                        println!("Overrides loaded from {path}.");
                    }
                    Err(e) => println!("Error: {e}"),
                },
                _ => println!("Usage: load <json|csv> <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
