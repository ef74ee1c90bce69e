use async_graphql::{PathSegment, ServerError};
use colored::Colorize;
use schemagen_graphql::SchemaGraph;
use schemagen_graphql::schema::SchemaType;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => print_error(&format!("Cannot render response: {e}")),
        },
        OutputFormat::Table => print_as_table(value),
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_errors(errors: &[ServerError]) {
    for error in errors {
        let path: Vec<String> = error
            .path
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => name.clone(),
                PathSegment::Index(index) => index.to_string(),
            })
            .collect();
        if path.is_empty() {
            print_error(&error.message);
        } else {
            print_error(&format!("{} (at {})", error.message, path.join(".")));
        }
    }
}

/// Number of fields, members or values a node declares.
fn member_count(ty: &SchemaType) -> usize {
    match ty {
        SchemaType::Object(node) => node.fields.len(),
        SchemaType::Interface(node) => node.fields.len(),
        SchemaType::Union(node) => node.members.len(),
        SchemaType::Enum(node) => node.values.len(),
        SchemaType::Scalar(_) => 0,
        SchemaType::InputObject(node) => node.fields.len(),
    }
}

/// Rows for the `types` listing: roots first, then generated types.
pub fn type_rows(graph: &SchemaGraph) -> Vec<[String; 4]> {
    let roots = graph.roots().map(|root| {
        [
            root.name.clone(),
            "type".to_string(),
            root.fields.len().to_string(),
            root.description.clone().unwrap_or_default(),
        ]
    });
    let types = graph.types.values().map(|ty| {
        [
            ty.name().to_string(),
            ty.kind().to_string(),
            member_count(ty).to_string(),
            ty.description().unwrap_or_default().to_string(),
        ]
    });
    roots.chain(types).collect()
}

pub fn print_types(graph: &SchemaGraph, format: OutputFormat) {
    let rows = type_rows(graph);
    match format {
        OutputFormat::Json => {
            let value: Vec<Value> = rows
                .iter()
                .map(|[name, kind, members, description]| {
                    serde_json::json!({
                        "name": name,
                        "kind": kind,
                        "members": members.parse::<usize>().unwrap_or_default(),
                        "description": description,
                    })
                })
                .collect();
            print_value(&Value::Array(value), format);
        }
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Name", "Kind", "Members", "Description"]);
            for row in rows {
                builder.push_record(row);
            }
            let table = builder.build().with(Style::rounded()).to_string();
            println!("{table}");
            println!("Total: {}", graph.types.len() + graph.roots().count());
        }
    }
}

/// Tables a list of flat objects; anything else falls back to JSON.
fn print_as_table(value: &Value) {
    let rows = value
        .as_object()
        .filter(|data| data.len() == 1)
        .and_then(|data| data.values().next())
        .and_then(Value::as_array);

    let Some(rows) = rows.filter(|rows| rows.iter().all(Value::is_object)) else {
        print_value(value, OutputFormat::Json);
        return;
    };
    let Some(first) = rows.first().and_then(Value::as_object) else {
        println!("No results.");
        return;
    };

    let columns: Vec<&String> = first.keys().collect();
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for row in rows {
        builder.push_record(columns.iter().map(|c| cell(row.get(c.as_str()))));
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
