use cubical_persistence::output::csv_line;
use cubical_persistence::{
    load_grid, write_diagram, LocationMode, Method, PersistenceEngine, PersistenceParams,
};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(-1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "cubical-persistence".to_string());
    let config = parse_args(&program)?;

    let grid = load_grid(&config.input_path, config.params.threshold)?;
    println!(
        "grid: {}x{}x{} (dim {}), threshold {}",
        grid.ax(),
        grid.ay(),
        grid.az(),
        grid.dim(),
        grid.threshold()
    );

    let engine = PersistenceEngine::new(config.params);
    let output = engine.run(&grid);

    for count in &output.summary.pair_counts {
        println!("pairs in dim {}: {}", count.dim, count.pairs);
    }
    println!("total pairs: {}", output.summary.total_pairs);

    if config.print {
        for pair in &output.pairs {
            println!("{}", csv_line(pair, config.params.location));
        }
    }

    if let Some(path) = &config.output_path {
        write_diagram(path, &output.pairs, config.params.location)?;
        println!("diagram written to {}", path.display());
    }

    if let Some(path) = &config.json_out {
        let json = serde_json::to_string_pretty(&output.summary)
            .map_err(|e| format!("Failed to serialize JSON report: {e}"))?;
        fs::write(path, json)
            .map_err(|e| format!("Failed to write JSON report to {}: {e}", path.display()))?;
        println!("report written to {}", path.display());
    }

    Ok(())
}

struct CliConfig {
    input_path: PathBuf,
    output_path: Option<PathBuf>,
    json_out: Option<PathBuf>,
    params: PersistenceParams,
    print: bool,
}

fn parse_args(program: &str) -> Result<CliConfig, String> {
    let mut args = env::args().skip(1);
    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut json_out: Option<PathBuf> = None;
    let mut params = PersistenceParams::default();
    let mut print = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                println!("{}", usage(program));
                std::process::exit(0);
            }
            "--threshold" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--threshold expects a value\n{}", usage(program)))?;
                params.threshold = value
                    .parse()
                    .map_err(|_| format!("Invalid threshold '{value}'"))?;
            }
            "--maxdim" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--maxdim expects a value\n{}", usage(program)))?;
                params.maxdim = value
                    .parse()
                    .map_err(|_| format!("Invalid maxdim '{value}'"))?;
            }
            "--method" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--method expects a value\n{}", usage(program)))?;
                params.method = Method::from_str(&value)?;
            }
            "--top_dim" => {
                params.method = Method::TopDim;
            }
            "--min_cache_size" => {
                let value = args.next().ok_or_else(|| {
                    format!("--min_cache_size expects a value\n{}", usage(program))
                })?;
                params.min_cache_size = value
                    .parse()
                    .map_err(|_| format!("Invalid min_cache_size '{value}'"))?;
            }
            "--location" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--location expects a value\n{}", usage(program)))?;
                params.location = LocationMode::from_str(&value)?;
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--output expects a path\n{}", usage(program)))?;
                output_path = Some(PathBuf::from(value));
            }
            "--json-out" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("--json-out expects a path\n{}", usage(program)))?;
                json_out = Some(PathBuf::from(value));
            }
            "--print" => {
                print = true;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option '{arg}'\n{}", usage(program)));
            }
            _ => {
                if input_path.is_some() {
                    return Err(format!(
                        "Unexpected positional argument '{arg}'\n{}",
                        usage(program)
                    ));
                }
                input_path = Some(PathBuf::from(arg));
            }
        }
    }

    let input_path = input_path.ok_or_else(|| usage(program))?;
    Ok(CliConfig {
        input_path,
        output_path,
        json_out,
        params,
        print,
    })
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <grid.npy|grid.txt|grid.complex|image.png> [options]\n\n\
Computes the persistence diagram of the sublevel-set filtration of a scalar grid.\n\n\
Options:\n\
  --threshold <t>       exclude cells born at or above t (default: inf)\n\
  --maxdim <d>          highest homology dimension (default: 2)\n\
  --method <name>       link_find | compute_pairs | top_dim (default: link_find)\n\
  --top_dim             shorthand for --method top_dim\n\
  --min_cache_size <n>  smallest reduced column worth caching (default: 0)\n\
  --output <path>       write the diagram (.csv | .npy | .complex)\n\
  --location <mode>     birth | death | none (default: birth)\n\
  --json-out <path>     write a machine-readable run report\n\
  --print               echo pairs to stdout\n\n\
Examples:\n  {program} volume.npy --maxdim 2 --output diagram.csv\n  {program} image.png --top_dim --print\n"
    )
}
