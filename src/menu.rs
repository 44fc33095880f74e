use std::io::{self, BufRead, Write};

use chrono::{NaiveDate, NaiveDateTime};

use crate::event::{Attendee, Event};
use crate::manager::EventManager;

const MENU: &str = "
1. Add event
2. Edit event
3. Delete event
4. List upcoming events
5. List past events
6. Register attendee
7. View attendees
8. Mark attendance
9. List events in chronological order
10. Check for schedule conflict
11. Save and exit
";

/// Drives the menu loop until the user exits or the input ends. All free-text
/// parsing happens here; the manager only ever sees well-typed arguments.
/// Saving the data file is the caller's job once this returns.
pub fn run<R: BufRead, W: Write>(
    manager: &mut EventManager,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    loop {
        output.write_all(MENU.as_bytes())?;
        let Some(choice) = prompt(&mut input, &mut output, "Choose an option")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => add_event(manager, &mut input, &mut output)?,
            "2" => edit_event(manager, &mut input, &mut output)?,
            "3" => delete_event(manager, &mut input, &mut output)?,
            "4" => list_events(&mut output, "Upcoming events", &manager.upcoming_events())?,
            "5" => list_events(&mut output, "Past events", &manager.past_events())?,
            "6" => register_attendee(manager, &mut input, &mut output)?,
            "7" => view_attendees(manager, &mut input, &mut output)?,
            "8" => mark_attendance(manager, &mut input, &mut output)?,
            "9" => {
                let events: Vec<&Event> = manager.events_in_chronological_order().iter().collect();
                list_events(&mut output, "All events", &events)?;
            }
            "10" => check_conflict(manager, &mut input, &mut output)?,
            "11" => return Ok(()),
            other => writeln!(output, "Unknown option: {other}")?,
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        // EOF ends the session the same way "save and exit" does.
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0)
}

fn read_index<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<usize>> {
    let Some(raw) = prompt(input, output, "Event index")? else {
        return Ok(None);
    };

    match raw.parse() {
        Ok(index) => Ok(Some(index)),
        Err(_) => {
            writeln!(output, "'{raw}' is not a valid index")?;
            Ok(None)
        }
    }
}

fn read_event<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<Event>> {
    let Some(title) = prompt(input, output, "Title")? else {
        return Ok(None);
    };
    let Some(date_raw) = prompt(input, output, "Date (YYYY-MM-DD)")? else {
        return Ok(None);
    };
    let Some(date) = parse_date(&date_raw) else {
        writeln!(output, "'{date_raw}' is not a valid date, expected YYYY-MM-DD")?;
        return Ok(None);
    };
    let Some(time) = prompt(input, output, "Time (e.g. 14:30)")? else {
        return Ok(None);
    };
    let Some(location) = prompt(input, output, "Location")? else {
        return Ok(None);
    };
    let Some(description) = prompt(input, output, "Description")? else {
        return Ok(None);
    };

    Ok(Some(Event {
        title,
        date,
        time,
        location,
        description,
        attendees: Vec::new(),
    }))
}

fn add_event<R: BufRead, W: Write>(
    manager: &mut EventManager,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(event) = read_event(input, output)? else {
        return Ok(());
    };

    if manager.has_schedule_conflict(&event) {
        return writeln!(
            output,
            "Schedule conflict: an event on {} at {} already exists, not adding.",
            event.date.format("%Y-%m-%d"),
            event.time
        );
    }

    manager.add_event(event);
    writeln!(output, "Event added.")
}

fn edit_event<R: BufRead, W: Write>(
    manager: &mut EventManager,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(index) = read_index(input, output)? else {
        return Ok(());
    };
    let Some(event) = read_event(input, output)? else {
        return Ok(());
    };

    if manager.edit_event(index, event) {
        writeln!(output, "Event {index} replaced.")
    } else {
        writeln!(output, "No event at index {index}.")
    }
}

fn delete_event<R: BufRead, W: Write>(
    manager: &mut EventManager,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(index) = read_index(input, output)? else {
        return Ok(());
    };

    if manager.delete_event(index) {
        writeln!(output, "Event {index} deleted, later indices shifted down.")
    } else {
        writeln!(output, "No event at index {index}.")
    }
}

fn list_events<W: Write>(output: &mut W, heading: &str, events: &[&Event]) -> io::Result<()> {
    writeln!(output, "{heading}:")?;

    if events.is_empty() {
        return writeln!(output, "  (none)");
    }

    for (index, event) in events.iter().enumerate() {
        writeln!(
            output,
            "  {index}. {} on {} at {} in {} ({})",
            event.title,
            event.date.format("%Y-%m-%d"),
            event.time,
            event.location,
            event.description
        )?;
    }

    Ok(())
}

fn register_attendee<R: BufRead, W: Write>(
    manager: &mut EventManager,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(index) = read_index(input, output)? else {
        return Ok(());
    };
    let Some(name) = prompt(input, output, "Attendee name")? else {
        return Ok(());
    };

    if manager.register_attendee(index, Attendee::new(name)) {
        writeln!(output, "Attendee registered.")
    } else {
        writeln!(output, "No event at index {index}.")
    }
}

fn view_attendees<R: BufRead, W: Write>(
    manager: &mut EventManager,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(index) = read_index(input, output)? else {
        return Ok(());
    };

    let attendees = manager.attendees(index);
    writeln!(output, "Attendees of event {index}:")?;

    if attendees.is_empty() {
        return writeln!(output, "  (none)");
    }

    for attendee in attendees {
        let status = if attendee.is_present { "present" } else { "absent" };
        writeln!(output, "  {} [{status}]", attendee.name)?;
    }

    Ok(())
}

fn mark_attendance<R: BufRead, W: Write>(
    manager: &mut EventManager,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(index) = read_index(input, output)? else {
        return Ok(());
    };
    let Some(name) = prompt(input, output, "Attendee name")? else {
        return Ok(());
    };
    let Some(answer) = prompt(input, output, "Present? (y/n)")? else {
        return Ok(());
    };

    let present = match answer.as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        other => {
            return writeln!(output, "'{other}' is not a valid answer, expected y or n");
        }
    };

    if manager.mark_attendance(index, &name, present) {
        writeln!(output, "Attendance updated for every attendee named '{name}'.")
    } else {
        writeln!(output, "No attendee named '{name}' in event {index}.")
    }
}

fn check_conflict<R: BufRead, W: Write>(
    manager: &EventManager,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(date_raw) = prompt(input, output, "Date (YYYY-MM-DD)")? else {
        return Ok(());
    };
    let Some(date) = parse_date(&date_raw) else {
        writeln!(output, "'{date_raw}' is not a valid date, expected YYYY-MM-DD")?;
        return Ok(());
    };
    let Some(time) = prompt(input, output, "Time (e.g. 14:30)")? else {
        return Ok(());
    };

    let probe = Event {
        title: String::new(),
        date,
        time,
        location: String::new(),
        description: String::new(),
        attendees: Vec::new(),
    };

    if manager.has_schedule_conflict(&probe) {
        writeln!(output, "Conflict: an event is already scheduled for that slot.")
    } else {
        writeln!(output, "No conflict for that slot.")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn session(manager: &mut EventManager, script: &str) -> String {
        let mut output = Vec::new();
        run(manager, io::Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn add_flow_creates_an_event() {
        let mut manager = EventManager::new();
        session(
            &mut manager,
            "1\nStandup\n2030-01-01\n09:00\nRoom 1\nDaily sync\n11\n",
        );

        assert_eq!(manager.len(), 1);
        let event = manager.event(0).unwrap();
        assert_eq!(event.title, "Standup");
        assert_eq!(event.time, "09:00");
        assert_eq!(
            event.date,
            NaiveDate::from_ymd_opt(2030, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert!(event.attendees.is_empty());
    }

    #[test]
    fn add_flow_refuses_a_conflicting_slot() {
        let mut manager = EventManager::new();
        let script = "1\nFirst\n2030-01-01\n09:00\nRoom 1\n\n\
                      1\nSecond\n2030-01-01\n09:00\nRoom 2\n\n11\n";
        let output = session(&mut manager, script);

        assert_eq!(manager.len(), 1);
        assert!(output.contains("Schedule conflict"));
    }

    #[test]
    fn unparseable_date_never_reaches_the_manager() {
        let mut manager = EventManager::new();
        let output = session(&mut manager, "1\nBroken\n01/02/2030\n11\n");

        assert!(manager.is_empty());
        assert!(output.contains("not a valid date"));
        // The leftover "11" line doubled as the exit choice.
    }

    #[test]
    fn attendance_round_trip_through_the_menu() {
        let mut manager = EventManager::new();
        let script = "1\nMeetup\n2030-01-01\n18:00\nCafe\n\n\
                      6\n0\nAda\n8\n0\nAda\ny\n7\n0\n11\n";
        let output = session(&mut manager, script);

        assert!(manager.attendees(0)[0].is_present);
        assert!(output.contains("Ada [present]"));
    }

    #[test]
    fn eof_ends_the_session() {
        let mut manager = EventManager::new();
        let output = session(&mut manager, "4\n");

        assert!(output.contains("Upcoming events:"));
    }
}
