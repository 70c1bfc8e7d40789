//! Command-line driver for the record form core.
//!
//! Without arguments it prints ping/version. With a database path it drives
//! the form controller the same way a UI would:
//!
//! ```text
//! recordform_cli <db> list
//! recordform_cli <db> add <name> <email> <age>
//! recordform_cli <db> update <id> <name> <email> <age>
//! recordform_cli <db> delete <id>
//! ```

use recordform_core::{FormController, FormField, FormView, RecordId, SqliteRecordStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("recordform_core ping={}", recordform_core::ping());
        println!("recordform_core version={}", recordform_core::core_version());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(view) => {
            print_table(&view);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<FormView, String> {
    let (db_path, command) = match args {
        [db_path, command @ ..] => (db_path, command),
        [] => return Err("missing database path".to_string()),
    };

    let store = SqliteRecordStore::open(db_path).map_err(|err| err.to_string())?;
    let mut form = FormController::new(store);
    form.mount().map_err(|err| err.to_string())?;

    let command: Vec<&str> = command.iter().map(String::as_str).collect();
    match command.as_slice() {
        [] | ["list"] => {}
        ["add", name, email, age] => {
            fill(&mut form, name, email, age);
            form.submit().map_err(|err| err.to_string())?;
        }
        ["update", id, name, email, age] => {
            form.begin_edit(parse_id(id)?)
                .map_err(|err| err.to_string())?;
            fill(&mut form, name, email, age);
            form.submit().map_err(|err| err.to_string())?;
        }
        ["delete", id] => {
            form.delete(parse_id(id)?).map_err(|err| err.to_string())?;
        }
        other => return Err(format!("unrecognized command: {}", other.join(" "))),
    }

    Ok(form.view())
}

fn fill(form: &mut FormController<SqliteRecordStore>, name: &str, email: &str, age: &str) {
    form.set_field(FormField::Name, name);
    form.set_field(FormField::Email, email);
    form.set_field(FormField::Age, age);
}

fn parse_id(raw: &str) -> Result<RecordId, String> {
    raw.parse::<i64>()
        .map(RecordId)
        .map_err(|_| format!("invalid record id `{raw}`"))
}

fn print_table(view: &FormView) {
    println!("{}", view.headers[..4].join("\t"));
    for row in &view.rows {
        println!("{}\t{}\t{}\t{}", row.id, row.name, row.email, row.age);
    }
}
