use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use itabscan_core::{Binary, InterfaceType, Method, Type};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Recover Go interface implementations from compiled binaries
#[derive(Parser)]
#[command(
    name = "itabscan",
    about = "List the interfaces a Go binary's concrete types implement",
    version,
    author
)]
struct Cli {
    /// Path to binary file
    #[arg(required = true)]
    path: std::path::PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the detected container format
    Kind,
    /// List every recovered interface implementation
    Interfaces {
        /// Emit JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct InterfaceView<'a> {
    name: &'a str,
    pkg_path: &'a str,
    implemented: &'a str,
    methods: Vec<MethodView<'a>>,
}

#[derive(Serialize)]
struct MethodView<'a> {
    name: &'a str,
    signature: &'a str,
    inputs: Vec<TypeView<'a>>,
    outputs: Vec<TypeView<'a>>,
}

#[derive(Serialize)]
struct TypeView<'a> {
    name: &'a str,
    pkg_path: &'a str,
    is_pointer: bool,
}

impl<'a> From<&'a Type> for TypeView<'a> {
    fn from(t: &'a Type) -> Self {
        TypeView {
            name: &t.name,
            pkg_path: &t.pkg_path,
            is_pointer: t.is_pointer,
        }
    }
}

impl<'a> From<&'a Method> for MethodView<'a> {
    fn from(m: &'a Method) -> Self {
        MethodView {
            name: &m.name,
            signature: &m.signature,
            inputs: m.inputs.iter().map(TypeView::from).collect(),
            outputs: m.outputs.iter().map(TypeView::from).collect(),
        }
    }
}

impl<'a> From<&'a InterfaceType> for InterfaceView<'a> {
    fn from(i: &'a InterfaceType) -> Self {
        InterfaceView {
            name: &i.name,
            pkg_path: &i.pkg_path,
            implemented: &i.implemented,
            methods: i.methods.iter().map(MethodView::from).collect(),
        }
    }
}

#[derive(Tabled)]
struct MethodRow {
    #[tabled(rename = "Method")]
    name: String,
    #[tabled(rename = "Signature")]
    signature: String,
    #[tabled(rename = "In")]
    inputs: String,
    #[tabled(rename = "Out")]
    outputs: String,
}

fn type_list(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| {
            let name = t.qualified_name();
            if t.is_pointer && !name.starts_with('*') {
                format!("*{name}")
            } else {
                name
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_tables(types: &[InterfaceType]) {
    if types.is_empty() {
        println!("No interface implementations found (no itab symbols).");
        return;
    }
    for iface in types {
        let qualified = if iface.pkg_path.is_empty() {
            iface.name.clone()
        } else {
            format!("{}.{}", iface.pkg_path, iface.name)
        };
        println!(
            "{} {} {}",
            iface.implemented.bold().green(),
            "implements".dimmed(),
            qualified.bold().cyan()
        );

        let rows: Vec<MethodRow> = iface
            .methods
            .iter()
            .map(|m| MethodRow {
                name: m.name.clone(),
                signature: m.signature.clone(),
                inputs: type_list(&m.inputs),
                outputs: type_list(&m.outputs),
            })
            .collect();
        if !rows.is_empty() {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        println!();
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let bin = Binary::open(&cli.path)
        .with_context(|| format!("failed to open {}", cli.path.display()))?;

    match cli.command {
        Command::Kind => {
            println!("Format: {}", bin.kind());
        }

        Command::Interfaces { json } => {
            let types = bin
                .defined_interface_types()
                .with_context(|| format!("failed to recover interfaces from {}", cli.path.display()))?;
            log::info!("Recovered {} interface implementations", types.len());

            if json {
                let views: Vec<InterfaceView> = types.iter().map(InterfaceView::from).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                print_tables(&types);
            }
        }
    }

    Ok(())
}
