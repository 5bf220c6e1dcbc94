use super::{output_err, OutputFormat};
use crate::app::{person_insert, person_list, Person};
use crate::error::AppError;
use crate::infra::Store;
use std::io::{BufRead, Write};

/// Insert one person. Without `name`, prompt for it and read one line from `input`.
pub fn cmd_person_insert<R: BufRead, W: Write>(
    store: &Store,
    name: Option<String>,
    input: &mut R,
    out: &mut W,
    format: OutputFormat,
) -> Result<Person, AppError> {
    let name = match name {
        Some(name) => name,
        None => read_name(input, out, format)?,
    };
    let id = person_insert(store, &name)?;
    let person = Person {
        id,
        name: name.trim().to_string(),
    };

    match format {
        OutputFormat::Text => {
            writeln!(out, "Inserted {} | {}", person.id, person.name).map_err(output_err)?
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &person).map_err(output_err)?;
            writeln!(out).map_err(output_err)?;
        }
    }
    Ok(person)
}

fn read_name<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    format: OutputFormat,
) -> Result<String, AppError> {
    if format == OutputFormat::Text {
        write!(out, "Enter name: ").map_err(output_err)?;
        out.flush().map_err(output_err)?;
    }
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| AppError::InvalidInput(format!("could not read name: {}", e)))?;
    if read == 0 {
        return Err(AppError::InvalidInput("name is required".into()));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Print every person as `id | name`, ascending id. Returns the row count.
pub fn cmd_person_list<W: Write>(
    store: &Store,
    out: &mut W,
    format: OutputFormat,
) -> Result<usize, AppError> {
    let list = person_list(store)?;
    match format {
        OutputFormat::Text => {
            let mut count = 0;
            for person in &list {
                let person = person?;
                writeln!(out, "{} | {}", person.id, person.name).map_err(output_err)?;
                count += 1;
            }
            Ok(count)
        }
        OutputFormat::Json => {
            let people = list.to_vec()?;
            serde_json::to_writer(&mut *out, &people).map_err(output_err)?;
            writeln!(out).map_err(output_err)?;
            Ok(people.len())
        }
    }
}
