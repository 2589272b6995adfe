use clap::{Parser, ValueEnum};
use graphviz_rust::cmd::{CommandArg, Format};
use graphviz_rust::exec_dot;
use log::info;
use shacl_ast::{Ast, Compiler, TransformOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Path to the shapes file (Turtle)
    #[arg(short, long, value_name = "FILE")]
    shapes_file: PathBuf,

    /// Extra prefix used for naming, as `name=IRI`; may be repeated
    #[arg(short, long, value_name = "PREFIX=IRI", value_parser = parse_prefix)]
    prefix: Vec<(String, String)>,

    /// Reject malformed boolean and string default values instead of coercing them
    #[arg(long)]
    strict_defaults: bool,
}

#[derive(ValueEnum, Clone, Debug, Default)]
enum DumpFormat {
    /// One line per shape followed by every object type
    #[default]
    Text,
    /// The Rust debug representation of the AST
    Debug,
}

#[derive(Parser)]
struct DumpArgs {
    #[clap(flatten)]
    common: CommonArgs,

    /// The output format for the AST
    #[arg(long, value_enum, default_value_t = DumpFormat::Text)]
    format: DumpFormat,
}

#[derive(Parser)]
struct NamesArgs {
    #[clap(flatten)]
    common: CommonArgs,
}

#[derive(Parser)]
struct GraphvizArgs {
    #[clap(flatten)]
    common: CommonArgs,
}

#[derive(Parser)]
struct PdfArgs {
    #[clap(flatten)]
    common: CommonArgs,

    /// Path to the output PDF file
    #[arg(short, long, value_name = "FILE")]
    output_file: PathBuf,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compile the shapes and print the resulting AST
    Dump(DumpArgs),
    /// Print the resolved name of every shape and where it came from
    Names(NamesArgs),
    /// Output the Graphviz DOT string of the type graph
    Graphviz(GraphvizArgs),
    /// Generate a PDF of the type graph using Graphviz
    Pdf(PdfArgs),
}

fn parse_prefix(value: &str) -> Result<(String, String), String> {
    let (prefix, namespace) = value
        .split_once('=')
        .ok_or_else(|| format!("expected PREFIX=IRI, found {:?}", value))?;
    Ok((prefix.to_string(), namespace.to_string()))
}

fn get_compiler(common: &CommonArgs) -> Result<Compiler, Box<dyn std::error::Error>> {
    let path = common
        .shapes_file
        .to_str()
        .ok_or("Invalid shapes file path")?;
    info!("Compiling shapes from {}", path);
    let mut compiler = Compiler::from_file(path)
        .map_err(|e| format!("Error loading shapes: {}", e))?
        .with_options(TransformOptions {
            strict_defaults: common.strict_defaults,
        });
    for (prefix, namespace) in &common.prefix {
        compiler = compiler.with_prefix(prefix, namespace);
    }
    Ok(compiler)
}

fn compile(common: &CommonArgs) -> Result<Ast, Box<dyn std::error::Error>> {
    let compiler = get_compiler(common)?;
    compiler
        .compile()
        .map_err(|e| format!("Error compiling shapes ({:?}): {}", e.kind(), e).into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Dump(args) => {
            let ast = compile(&args.common)?;
            match args.format {
                DumpFormat::Text => print!("{}", ast),
                DumpFormat::Debug => println!("{:#?}", ast),
            }
        }
        Commands::Names(args) => {
            let ast = compile(&args.common)?;
            println!("Shape\tName\tSource");
            for (shape, _) in ast.names() {
                if let Some(name) = ast.name(shape) {
                    let (source, resolved) = name.resolved_with_source();
                    println!("{}\t{}\t{:?}", shape, resolved, source);
                }
            }
        }
        Commands::Graphviz(args) => {
            let dot_string = compile(&args.common)?.to_graphviz();
            println!("{}", dot_string);
        }
        Commands::Pdf(args) => {
            let dot_string = compile(&args.common)?.to_graphviz();

            let output_format = Format::Pdf;
            let output_file_path_str = args
                .output_file
                .to_str()
                .ok_or("Invalid output file path")?;

            let cmd_args = vec![
                CommandArg::Format(output_format),
                CommandArg::Output(output_file_path_str.to_string()),
            ];

            exec_dot(dot_string, cmd_args)
                .map_err(|e| format!("Graphviz execution error: {}", e))?;

            println!("PDF generated at: {}", args.output_file.display());
        }
    }
    Ok(())
}
