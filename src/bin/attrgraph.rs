//! attrgraph - build a graph from keyed JSON records and query it
//!
//! Usage: attrgraph <records.json> [--options <options.json>] [--directed]
//!                  [--incremental] [--vs KEY=JSON]... [--es KEY=JSON]...
//!
//! The records document has the shape
//! `{"vertices": [{...}, ...] | null, "edges": [{...}, ...]}`.
//! Each `--vs`/`--es` adds one keyword predicate; the value is parsed as
//! JSON and falls back to a plain string.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use attrgraph::{BuildOptions, EntitySeq, Graph, GraphBuilder, Operand, Query, Value};

#[derive(Debug, Deserialize)]
struct RecordsDocument {
    #[serde(default)]
    vertices: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    edges: Vec<serde_json::Value>,
}

#[derive(Debug, Default)]
struct Args {
    records: PathBuf,
    options: Option<PathBuf>,
    directed: bool,
    incremental: bool,
    vertex_preds: Vec<(String, Operand)>,
    edge_preds: Vec<(String, Operand)>,
}

fn usage() {
    eprintln!("Usage: attrgraph <records.json> [options]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <records.json>     {{\"vertices\": [...] | null, \"edges\": [...]}}");
    eprintln!("  --options <file>   BuildOptions as JSON");
    eprintln!("  --directed         Build a directed graph");
    eprintln!("  --incremental      Add edges one record at a time");
    eprintln!("  --vs KEY=JSON      Vertex predicate, e.g. --vs age_gt=30");
    eprintln!("  --es KEY=JSON      Edge predicate, e.g. --es _source_in=[0,1]");
}

fn parse_predicate(arg: &str) -> Result<(String, Operand)> {
    let (key, raw) = arg
        .split_once('=')
        .with_context(|| format!("predicate '{}' is not KEY=VALUE", arg))?;
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(raw),
    };
    let operand = match value {
        Value::List(items) => Operand::List(items),
        other => Operand::Scalar(other),
    };
    Ok((key.to_string(), operand))
}

fn parse_args() -> Result<Args> {
    let mut raw = std::env::args().skip(1);
    let mut args = Args::default();
    let mut records = None;

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--options" => {
                let path = raw.next().context("--options needs a path")?;
                args.options = Some(PathBuf::from(path));
            }
            "--directed" => args.directed = true,
            "--incremental" => args.incremental = true,
            "--vs" => {
                let pred = raw.next().context("--vs needs KEY=VALUE")?;
                args.vertex_preds.push(parse_predicate(&pred)?);
            }
            "--es" => {
                let pred = raw.next().context("--es needs KEY=VALUE")?;
                args.edge_preds.push(parse_predicate(&pred)?);
            }
            other if other.starts_with("--") => bail!("unknown flag {}", other),
            other => {
                if records.is_some() {
                    bail!("more than one records file given");
                }
                records = Some(PathBuf::from(other));
            }
        }
    }

    match records {
        Some(path) => {
            args.records = path;
            Ok(args)
        }
        None => {
            usage();
            bail!("no records file given");
        }
    }
}

fn query_from(preds: &[(String, Operand)]) -> Query<'static> {
    preds
        .iter()
        .fold(Query::new(), |q, (key, operand)| q.pred(key, operand.clone()))
}

fn print_selection(label: &str, seq: &EntitySeq<&Graph>) {
    println!("{} selected: {}", label, seq.len());
    for entity in seq.iter() {
        let attrs: Vec<String> = entity
            .attributes()
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        match entity.tuple() {
            Some((s, t)) => println!("  [{}] {} -> {}  {}", entity.index(), s, t, attrs.join(" ")),
            None => println!("  [{}] {}", entity.index(), attrs.join(" ")),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("ATTRGRAPH_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let mut options = match &args.options {
        Some(path) => BuildOptions::from_json_file(path)
            .with_context(|| format!("reading options from {}", path.display()))?,
        None => BuildOptions::default(),
    };
    options.directed |= args.directed;
    options.incremental |= args.incremental;
    debug!(?options, "build options");

    let text = fs::read_to_string(&args.records)
        .with_context(|| format!("reading {}", args.records.display()))?;
    let document: RecordsDocument = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.records.display()))?;
    if document.edges.is_empty() && document.vertices.is_none() {
        warn!("records document has neither vertices nor edges");
    }

    let graph = GraphBuilder::new(options)
        .build(document.vertices, document.edges)
        .context("building graph")?;
    println!("{}", graph);

    if !args.vertex_preds.is_empty() {
        let selected = graph.vs().select(&query_from(&args.vertex_preds))?;
        print_selection("vertices", &selected);
    }
    if !args.edge_preds.is_empty() {
        let selected = graph.es().select(&query_from(&args.edge_preds))?;
        print_selection("edges", &selected);
    }

    Ok(())
}
