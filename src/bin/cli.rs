use std::io::{self, Write};
use polars::prelude::{AnyValue, Column, DataFrame};
use semesterplan::diagnostics::Tee;
use semesterplan::{
    Diagnostic, Extractor, ExtractorConfig, Plan, Table, TracingSink, load_plan_from_csv,
    load_plan_from_json, load_table_from_html_file, save_plan_to_csv, save_plan_to_json,
};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "sqlite")]
use semesterplan::{PlanStore, SqlitePlanStore};

fn cell_text(column: &Column, row_idx: usize) -> String {
    match column.get(row_idx) {
        Ok(AnyValue::Null) | Err(_) => String::new(),
        Ok(AnyValue::String(s)) => s.to_string(),
        Ok(AnyValue::Boolean(true)) => "x".to_string(),
        Ok(AnyValue::Boolean(false)) => String::new(),
        Ok(av) => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| columns.iter().map(|col| cell_text(col, row_idx)).collect())
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, s) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(s);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(s.chars().count())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <file.html>                   Load a plan export\n  config <file.json>                 Load extractor settings\n  extract                            Extract events from the loaded export\n  show                               Show extracted events\n  classes                            List known classes\n  diagnostics                        List problems found by the last extract\n  save json|csv <path>               Write events to a file\n  load json|csv <path>               Read events back from a file\n  save sqlite <path>                 Write events to an sqlite database\n  load sqlite <path>                 Read events from an sqlite database\n  quit|exit                          Exit"
    );
}

fn show(plan: &Plan) {
    match plan.to_dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error: {}", e),
    }
}

fn extract(config: &ExtractorConfig, table: &Table) -> Option<(Plan, Vec<Diagnostic>)> {
    let extractor = Extractor::new(config.clone());
    let mut warnings = TracingSink;
    let mut sink = Tee::new(&mut warnings);
    match extractor.extract(table, &mut sink) {
        Ok(plan) => Some((plan, sink.collected)),
        Err(e) => {
            println!("Extract error: {}", e);
            None
        }
    }
}

fn save(plan: &Plan, format: &str, path: &str) {
    let res = match format {
        "json" => save_plan_to_json(plan, path),
        "csv" => save_plan_to_csv(plan, path),
        #[cfg(feature = "sqlite")]
        "sqlite" => SqlitePlanStore::new(path).and_then(|store| store.save_plan(plan)),
        _ => {
            println!("Usage: save json|csv|sqlite <path>");
            return;
        }
    };
    match res {
        Ok(_) => println!("Saved {} events to {}", plan.len(), path),
        Err(e) => println!("Error: {}", e),
    }
}

fn load_plan(format: &str, path: &str) -> Option<Plan> {
    let res = match format {
        "json" => load_plan_from_json(path),
        "csv" => load_plan_from_csv(path),
        #[cfg(feature = "sqlite")]
        "sqlite" => SqlitePlanStore::new(path).and_then(|store| {
            store
                .load_plan()?
                .ok_or(semesterplan::PersistenceError::NotFound)
        }),
        _ => {
            println!("Unsupported format: {}", format);
            return None;
        }
    };
    match res {
        Ok(plan) => Some(plan),
        Err(e) => {
            println!("Error: {}", e);
            None
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = ExtractorConfig::default();
    let mut table: Option<Table> = None;
    let mut plan = Plan::default();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    println!("Semesterplan Tool (CLI) - type 'help' for commands\n");

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
        if input.is_empty() { continue; }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "load" => match (parts.next(), parts.next()) {
                (Some(format @ ("json" | "csv" | "sqlite")), Some(path)) => {
                    if let Some(loaded) = load_plan(format, path) {
                        plan = loaded;
                        diagnostics.clear();
                        println!("Loaded {} events, {} classes.", plan.len(), plan.classes().len());
                    }
                }
                (Some(path), None) => match load_table_from_html_file(path) {
                    Ok(loaded) => {
                        println!("Loaded {} rows.", loaded.rows.len());
                        table = Some(loaded);
                    }
                    Err(e) => println!("Error: {}", e),
                },
                _ => println!("Usage: load <file.html> | load json|csv|sqlite <path>"),
            },
            "config" => match parts.next() {
                Some(path) => match ExtractorConfig::from_json_file(path) {
                    Ok(loaded) => {
                        config = loaded;
                        println!("Config loaded.");
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: config <file.json>"),
            },
            "extract" => {
                let Some(table) = &table else {
                    println!("No export loaded. Use 'load <file.html>' first.");
                    continue;
                };
                if let Some((extracted, found)) = extract(&config, table) {
                    plan = extracted;
                    diagnostics = found;
                    println!(
                        "Extracted {} events for {} classes ({} diagnostics).",
                        plan.len(),
                        plan.classes().len(),
                        diagnostics.len()
                    );
                }
            }
            "show" => show(&plan),
            "classes" => {
                if plan.classes().is_empty() {
                    println!("No classes.");
                }
                for class in plan.classes() {
                    println!("{} ({} events)", class, plan.events_for(class).count());
                }
            }
            "diagnostics" => {
                if diagnostics.is_empty() {
                    println!("No diagnostics.");
                }
                for diagnostic in &diagnostics {
                    println!("{}", diagnostic);
                }
            }
            "save" => match (parts.next(), parts.next()) {
                (Some(format), Some(path)) => save(&plan, format, path),
                _ => println!("Usage: save json|csv|sqlite <path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
