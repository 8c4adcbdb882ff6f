// CLI entry point for the SFCM symbol generator.
//
// Runs one generation and prints the result as JSON on stdout. Logs go to
// stderr through `tracing-subscriber` (default level `warn`, override with
// `RUST_LOG`), so stdout can be piped straight into a renderer.
//
// Usage:
//   generate --keywords <LIST> [OPTIONS]
//     --keywords <LIST>       Comma-separated keywords, at most 10 (required)
//     --seed <SEED>           Seed string (default: derived from keywords + canvas)
//     --canvas <PRESET>       square|4_5|9_16|16_9|fit|custom (default: square)
//     --width <PX>            Width for fit/custom; with square, implies custom
//     --height <PX>           Height for fit/custom canvases
//     --length <0-100>        Line length slider (default: 50)
//     --curvature <0-100>     Curvature slider (default: 50)
//     --clusters <0-100>      Cluster count slider (default: 33)
//     --spread <0-100>        Cluster spread slider (default: 40)
//     --options <JSON>        EngineOptions as JSON (replaces the sliders)
//     --dictionary <PATH>     Semantic dictionary JSON (default: embedded)
//     --force-orientation     Turn portrait-shaped drawings upright
//     --bridges               Add dashed links between keyword anchors
//     --debug                 Include the debug payload
//     --pretty                Pretty-print the JSON

use sfcm_engine::canvas::{CanvasSize, validate_custom_size};
use sfcm_engine::dictionary::SemanticMap;
use sfcm_engine::input::{derive_seed, parse_keywords};
use sfcm_engine::{EngineOptions, GenerateRequest, SliderState, generate, generate_with_map};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parsed command line.
struct CliArgs {
    keywords: Option<String>,
    seed: Option<String>,
    canvas: CanvasSize,
    width: Option<f64>,
    height: Option<f64>,
    sliders: SliderState,
    options_json: Option<String>,
    dictionary: Option<String>,
    force_orientation: bool,
    bridges: bool,
    debug: bool,
    pretty: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            keywords: None,
            seed: None,
            canvas: CanvasSize::Square,
            width: None,
            height: None,
            sliders: SliderState::default(),
            options_json: None,
            dictionary: None,
            force_orientation: false,
            bridges: false,
            debug: false,
            pretty: false,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();

    let keywords = parse_keywords(args.keywords.as_deref().unwrap_or_default());
    if keywords.is_empty() {
        eprintln!("--keywords requires at least one non-empty keyword");
        print_usage();
        std::process::exit(1);
    }

    let canvas = match canvas_choice(args.canvas, args.width, args.height) {
        Ok(choice) => choice.resolve(),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let seed = args
        .seed
        .clone()
        .unwrap_or_else(|| derive_seed(&keywords, canvas.width, canvas.height));

    let mut options = match &args.options_json {
        Some(json) => serde_json::from_str::<EngineOptions>(json).unwrap_or_else(|e| {
            eprintln!("--options is not valid EngineOptions JSON: {e}");
            std::process::exit(1);
        }),
        None => args.sliders.to_options(false),
    };
    options.force_orientation |= args.force_orientation;
    options.origin_bridges |= args.bridges;

    let mut request = GenerateRequest::new(keywords, seed, canvas);
    request.options = options;
    request.include_debug = args.debug;
    if let Err(e) = request.validate() {
        eprintln!("Invalid request: {e}");
        std::process::exit(1);
    }
    info!(seed = %request.seed, width = canvas.width, height = canvas.height, "generating");

    let result = match &args.dictionary {
        Some(path) => {
            let map = load_dictionary(path);
            generate_with_map(&map, &request)
        }
        None => generate(&request),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    match json {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}

/// Settle the canvas from `--canvas`, `--width` and `--height`.
///
/// `fit` takes the size as its viewport. `custom`, or a size given with the
/// default `square`, needs both sides in range. The other fixed presets
/// reject a size instead of ignoring it.
fn canvas_choice(
    preset: CanvasSize,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<CanvasSize, String> {
    let sized = width.is_some() || height.is_some();
    let w = width.unwrap_or(0.0);
    let h = height.unwrap_or(0.0);
    match preset {
        CanvasSize::Fit { .. } => Ok(CanvasSize::Fit {
            viewport_width: w,
            viewport_height: h,
        }),
        CanvasSize::Custom { .. } => custom_canvas(w, h),
        CanvasSize::Square if sized => custom_canvas(w, h),
        fixed if sized => Err(format!(
            "--width/--height only apply to fit or custom canvases, not {}",
            fixed.id()
        )),
        fixed => Ok(fixed),
    }
}

fn custom_canvas(width: f64, height: f64) -> Result<CanvasSize, String> {
    if validate_custom_size(width, height) {
        Ok(CanvasSize::Custom { width, height })
    } else {
        Err(format!(
            "custom canvas needs --width and --height in 1..=10000, got {width}x{height}"
        ))
    }
}

fn load_dictionary(path: &str) -> SemanticMap {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read dictionary {path}: {e}");
        std::process::exit(1);
    });
    SemanticMap::from_json(&text).unwrap_or_else(|e| {
        eprintln!("Failed to load dictionary {path}: {e}");
        std::process::exit(1);
    })
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> CliArgs {
    let mut cli = CliArgs::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--keywords" => {
                i += 1;
                cli.keywords = Some(required(&args, i, "--keywords"));
            }
            "--seed" => {
                i += 1;
                cli.seed = Some(required(&args, i, "--seed"));
            }
            "--canvas" => {
                i += 1;
                cli.canvas =
                    required(&args, i, "--canvas").parse::<CanvasSize>().unwrap_or_else(|e| {
                        eprintln!("{e}");
                        std::process::exit(1);
                    });
            }
            "--width" => {
                i += 1;
                cli.width = Some(number(&args, i, "--width"));
            }
            "--height" => {
                i += 1;
                cli.height = Some(number(&args, i, "--height"));
            }
            "--length" => {
                i += 1;
                cli.sliders.line_length = number(&args, i, "--length");
            }
            "--curvature" => {
                i += 1;
                cli.sliders.curvature = number(&args, i, "--curvature");
            }
            "--clusters" => {
                i += 1;
                cli.sliders.cluster_count = number(&args, i, "--clusters");
            }
            "--spread" => {
                i += 1;
                cli.sliders.cluster_spread = number(&args, i, "--spread");
            }
            "--options" => {
                i += 1;
                cli.options_json = Some(required(&args, i, "--options"));
            }
            "--dictionary" => {
                i += 1;
                cli.dictionary = Some(required(&args, i, "--dictionary"));
            }
            "--force-orientation" => cli.force_orientation = true,
            "--bridges" => cli.bridges = true,
            "--debug" => cli.debug = true,
            "--pretty" => cli.pretty = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn required(args: &[String], i: usize, flag: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{flag} requires a value");
        std::process::exit(1);
    })
}

fn number(args: &[String], i: usize, flag: &str) -> f64 {
    args.get(i)
        .and_then(|s| s.parse().ok())
        .filter(|v: &f64| v.is_finite())
        .unwrap_or_else(|| {
            eprintln!("{flag} requires a number");
            std::process::exit(1);
        })
}

fn print_usage() {
    eprintln!("Usage: generate --keywords <LIST> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --keywords <LIST>       Comma-separated keywords, at most 10 (required)");
    eprintln!("  --seed <SEED>           Seed string (default: derived from keywords + canvas)");
    eprintln!("  --canvas <PRESET>       square|4_5|9_16|16_9|fit|custom (default: square)");
    eprintln!("  --width <PX>            Width for fit/custom; with square, implies custom");
    eprintln!("  --height <PX>           Height for fit/custom canvases");
    eprintln!("  --length <0-100>        Line length slider (default: 50)");
    eprintln!("  --curvature <0-100>     Curvature slider (default: 50)");
    eprintln!("  --clusters <0-100>      Cluster count slider (default: 33)");
    eprintln!("  --spread <0-100>        Cluster spread slider (default: 40)");
    eprintln!("  --options <JSON>        EngineOptions as JSON (replaces the sliders)");
    eprintln!("  --dictionary <PATH>     Semantic dictionary JSON (default: embedded)");
    eprintln!("  --force-orientation     Turn portrait-shaped drawings upright");
    eprintln!("  --bridges               Add dashed links between keyword anchors");
    eprintln!("  --debug                 Include the debug payload");
    eprintln!("  --pretty                Pretty-print the JSON");
    eprintln!("  --help, -h              Show this help");
}
