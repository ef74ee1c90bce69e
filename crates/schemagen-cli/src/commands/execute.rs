use std::io::Read;

use anyhow::{Context, Result};
use async_graphql::{Request, Response, Variables};
use futures_util::StreamExt;
use serde_json::Value;

use crate::cli::{OutputFormat, QueryArgs, SubscribeArgs};
use crate::output::{print_errors, print_success, print_value};
use crate::sample::Sample;

/// Builds a request from a document and optional JSON variables.
pub fn request(document: String, variables: Option<&str>) -> Result<Request> {
    let request = Request::new(document);
    let Some(variables) = variables else {
        return Ok(request);
    };
    let variables: Value =
        serde_json::from_str(variables).context("Variables must be a JSON object")?;
    anyhow::ensure!(variables.is_object(), "Variables must be a JSON object");
    Ok(request.variables(Variables::from_json(variables)))
}

fn read_document(document: Option<&str>) -> Result<String> {
    if let Some(document) = document {
        return Ok(document.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Cannot read document from stdin")?;
    Ok(buf)
}

/// Prints the data of `response`, failing when it carries errors.
fn report(response: Response, format: OutputFormat) -> Result<()> {
    let data = response.data.into_json()?;
    if !data.is_null() {
        print_value(&data, format);
    }
    if !response.errors.is_empty() {
        print_errors(&response.errors);
        anyhow::bail!("{} error(s) in response", response.errors.len());
    }
    Ok(())
}

pub async fn query(sample: &Sample, args: &QueryArgs, format: OutputFormat) -> Result<()> {
    let schema = sample.schema()?;
    let document = read_document(args.document.as_deref())?;
    let request = request(document, args.variables.as_deref())?;

    tracing::debug!("Executing document");
    report(schema.execute(request).await, format)
}

pub async fn subscribe(sample: &Sample, args: &SubscribeArgs, format: OutputFormat) -> Result<()> {
    let schema = sample.schema()?;
    let stream = schema.execute_stream(Request::new(args.document.clone()));
    let mut stream = match args.take {
        Some(take) => stream.take(take).boxed(),
        None => stream.boxed(),
    };

    let mut events = 0usize;
    while let Some(response) = stream.next().await {
        report(response, format)?;
        events += 1;
    }
    print_success(&format!("Subscription finished after {events} event(s)"));
    Ok(())
}
