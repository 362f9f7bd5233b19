use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use kurbo::Point;
use repeatgrid_core::storage::{load_document, save_document, save_svg_document};
use repeatgrid_core::{DragCommand, DragKind, DragOutcome, GridConfig, RepeatGridTool};

use crate::error::{CliError, CliResult};

#[derive(Debug, Parser)]
#[command(
    name = "repeatgrid",
    about = "Build repeat grids and export them as JSON or SVG",
    version
)]
pub struct Cli {
    /// Layout configuration file (JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a fresh single-cell grid document.
    New(NewArgs),

    /// Print the grid summary.
    Info { file: PathBuf },

    /// Turn the single element into an editable grid.
    Create { file: PathBuf },

    /// Collapse the grid back to its original element.
    Reset { file: PathBuf },

    /// Edit grid properties directly.
    Set(SetArgs),

    /// Replay a pointer drag on one of the grid handles.
    Drag(DragArgs),

    /// Fill every cell with an image file.
    Image(ImageArgs),

    /// Export the grid as SVG.
    Svg(SvgArgs),
}

#[derive(Debug, Args)]
pub struct NewArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub size: Option<f64>,
    #[arg(long)]
    pub text: Option<String>,
    /// Overwrite an existing document.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    pub file: PathBuf,
    #[arg(long, allow_negative_numbers = true)]
    pub columns: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub rows: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub horizontal_spacing: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub vertical_spacing: Option<f64>,
    #[arg(long)]
    pub size: Option<f64>,
    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandleArg {
    Columns,
    Rows,
    HorizontalSpacing,
    VerticalSpacing,
}

impl From<HandleArg> for DragKind {
    fn from(handle: HandleArg) -> Self {
        match handle {
            HandleArg::Columns => DragKind::ColumnResize,
            HandleArg::Rows => DragKind::RowResize,
            HandleArg::HorizontalSpacing => DragKind::HorizontalSpacing,
            HandleArg::VerticalSpacing => DragKind::VerticalSpacing,
        }
    }
}

#[derive(Debug, Args)]
pub struct DragArgs {
    pub file: PathBuf,
    #[arg(long, value_enum)]
    pub handle: HandleArg,
    /// Pointer-down position as `x,y`.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub from: Point,
    /// Pointer positions in order, as `x,y`. Repeat for each move event.
    #[arg(long = "to", value_parser = parse_point, required = true, allow_hyphen_values = true)]
    pub path: Vec<Point>,
}

#[derive(Debug, Args)]
pub struct ImageArgs {
    pub file: PathBuf,
    /// Image to embed. Omit together with --clear to drop the current image.
    pub image: Option<PathBuf>,
    #[arg(long, conflicts_with = "image")]
    pub clear: bool,
}

#[derive(Debug, Args)]
pub struct SvgArgs {
    pub file: PathBuf,
    /// Output path. Defaults to the document path with an `.svg` extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in `{value}`: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in `{value}`: {e}"))?;
    Ok(Point::new(x, y))
}

pub fn run(cli: Cli) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };

    match cli.command {
        Commands::New(args) => run_new(args, config),
        Commands::Info { file } => {
            let tool = open(&file, config)?;
            println!("{}", tool.info());
            Ok(())
        }
        Commands::Create { file } => edit(&file, config, |tool| {
            if !tool.create_grid() {
                log::warn!("Grid in {} is already active", file.display());
            }
            Ok(())
        }),
        Commands::Reset { file } => edit(&file, config, |tool| {
            tool.reset();
            Ok(())
        }),
        Commands::Set(args) => run_set(args, config),
        Commands::Drag(args) => run_drag(args, config),
        Commands::Image(args) => run_image(args, config),
        Commands::Svg(args) => run_svg(args, config),
    }
}

/// Open a document as a tool session.
fn open(path: &Path, config: GridConfig) -> CliResult<RepeatGridTool> {
    let model = load_document(path)?;
    Ok(RepeatGridTool::with_model(model, config))
}

/// Open, change and save a document.
fn edit(
    path: &Path,
    config: GridConfig,
    change: impl FnOnce(&mut RepeatGridTool) -> CliResult<()>,
) -> CliResult<()> {
    let mut tool = open(path, config)?;
    change(&mut tool)?;
    save_document(path, tool.model())?;
    println!("{}", tool.info());
    Ok(())
}

fn run_new(args: NewArgs, config: GridConfig) -> CliResult<()> {
    if args.file.exists() && !args.force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            args.file.display()
        )));
    }

    let mut tool = RepeatGridTool::new(config);
    if let Some(size) = args.size {
        tool.update_element_size(size)?;
    }
    if let Some(text) = args.text {
        tool.update_element_text(text);
    }
    save_document(&args.file, tool.model())?;
    println!("{}", tool.info());
    Ok(())
}

fn run_set(args: SetArgs, config: GridConfig) -> CliResult<()> {
    edit(&args.file, config, |tool| {
        if let Some(size) = args.size {
            tool.update_element_size(size)?;
        }
        if let Some(text) = args.text {
            tool.update_element_text(text);
        }
        if let Some(columns) = args.columns {
            tool.set_columns(columns);
        }
        if let Some(rows) = args.rows {
            tool.set_rows(rows);
        }
        if let Some(spacing) = args.horizontal_spacing {
            tool.set_horizontal_spacing(spacing);
        }
        if let Some(spacing) = args.vertical_spacing {
            tool.set_vertical_spacing(spacing);
        }
        Ok(())
    })
}

fn run_drag(args: DragArgs, config: GridConfig) -> CliResult<()> {
    edit(&args.file, config, |tool| {
        let kind = DragKind::from(args.handle);
        let started = tool.handle(DragCommand::StartDrag {
            kind,
            pointer: args.from,
        });
        if started != DragOutcome::Started {
            return Err(CliError::InvalidArgument(format!(
                "grid in {} is not active; run `repeatgrid create` first",
                args.file.display()
            )));
        }
        let mut relayouts = 0;
        for &pointer in &args.path {
            if tool.handle(DragCommand::PointerMoved { pointer }).needs_relayout() {
                relayouts += 1;
            }
        }
        tool.handle(DragCommand::EndDrag);
        log::debug!("Drag {:?} caused {} relayouts", kind, relayouts);
        Ok(())
    })
}

fn run_image(args: ImageArgs, config: GridConfig) -> CliResult<()> {
    edit(&args.file, config, |tool| {
        match (&args.image, args.clear) {
            (Some(path), _) => {
                let data = std::fs::read(path).map_err(|e| CliError::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                tool.load_image(&data, &name)?;
            }
            (None, true) => tool.clear_image(),
            (None, false) => {
                return Err(CliError::InvalidArgument(
                    "pass an image path or --clear".to_string(),
                ));
            }
        }
        Ok(())
    })
}

fn run_svg(args: SvgArgs, config: GridConfig) -> CliResult<()> {
    let tool = open(&args.file, config)?;
    let svg = tool.export_svg()?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension("svg"));
    save_svg_document(&output, &svg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use repeatgrid_core::GridModel;
    use tempfile::tempdir;

    fn load_model(path: &Path) -> GridModel {
        load_document(path).unwrap()
    }

    fn cli(command: Commands) -> Cli {
        Cli {
            config: None,
            command,
        }
    }

    #[test]
    fn test_parse_point_accepts_pairs() {
        assert_eq!(parse_point("250,0").unwrap(), Point::new(250.0, 0.0));
        assert_eq!(parse_point(" -4.5 , 3 ").unwrap(), Point::new(-4.5, 3.0));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_new_then_drag_columns() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.json");

        run(cli(Commands::New(NewArgs {
            file: file.clone(),
            size: Some(50.0),
            text: Some("Tile".to_string()),
            force: false,
        })))
        .unwrap();
        run(cli(Commands::Create { file: file.clone() })).unwrap();
        run(cli(Commands::Drag(DragArgs {
            file: file.clone(),
            handle: HandleArg::Columns,
            from: Point::new(0.0, 0.0),
            path: vec![Point::new(60.0, 0.0), Point::new(125.0, 0.0)],
        })))
        .unwrap();

        let model = load_model(&file);
        assert_eq!(model.columns(), 4);
        assert_eq!(model.element_text(), "Tile");
        assert!(model.is_active());
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.json");
        let args = || NewArgs {
            file: file.clone(),
            size: None,
            text: None,
            force: false,
        };
        run(cli(Commands::New(args()))).unwrap();
        let result = run(cli(Commands::New(args())));
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_drag_on_inactive_grid_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.json");
        run(cli(Commands::New(NewArgs {
            file: file.clone(),
            size: None,
            text: None,
            force: false,
        })))
        .unwrap();

        let result = run(cli(Commands::Drag(DragArgs {
            file: file.clone(),
            handle: HandleArg::Rows,
            from: Point::ZERO,
            path: vec![Point::new(0.0, 300.0)],
        })));
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
        assert_eq!(load_model(&file).rows(), 1);
    }

    #[test]
    fn test_set_and_export_svg() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.json");
        run(cli(Commands::New(NewArgs {
            file: file.clone(),
            size: None,
            text: None,
            force: false,
        })))
        .unwrap();
        run(cli(Commands::Set(SetArgs {
            file: file.clone(),
            columns: Some(2),
            rows: Some(-3),
            horizontal_spacing: Some(25.0),
            vertical_spacing: None,
            size: None,
            text: None,
        })))
        .unwrap();

        let model = load_model(&file);
        assert_eq!(model.columns(), 2);
        assert_eq!(model.rows(), 1);

        run(cli(Commands::Svg(SvgArgs {
            file: file.clone(),
            output: None,
        })))
        .unwrap();
        let svg = std::fs::read_to_string(dir.path().join("grid.svg")).unwrap();
        assert_eq!(svg.matches("<rect").count(), 2);
    }

    #[test]
    fn test_image_rejects_non_images() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.json");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "hello").unwrap();
        run(cli(Commands::New(NewArgs {
            file: file.clone(),
            size: None,
            text: None,
            force: false,
        })))
        .unwrap();

        let result = run(cli(Commands::Image(ImageArgs {
            file: file.clone(),
            image: Some(notes),
            clear: false,
        })));
        assert!(matches!(
            result,
            Err(CliError::Grid(repeatgrid_core::GridError::UnsupportedFileType(_)))
        ));
    }

    #[test]
    fn test_missing_document_is_reported() {
        let dir = tempdir().unwrap();
        let result = run(cli(Commands::Info {
            file: dir.path().join("absent.json"),
        }));
        assert!(matches!(result, Err(CliError::Storage(_))));
    }

    #[test]
    fn test_paths_are_written_as_given() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("my.grid.json");
        let output = dir.path().join("out.v1.svg");

        run(cli(Commands::New(NewArgs {
            file: file.clone(),
            size: None,
            text: None,
            force: false,
        })))
        .unwrap();
        run(cli(Commands::Svg(SvgArgs {
            file: file.clone(),
            output: Some(output.clone()),
        })))
        .unwrap();
        run(cli(Commands::Svg(SvgArgs {
            file: file.clone(),
            output: None,
        })))
        .unwrap();

        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["my.grid.json", "my.grid.svg", "out.v1.svg"]);
    }

    #[test]
    fn test_non_json_extension_is_kept() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.txt");
        run(cli(Commands::New(NewArgs {
            file: file.clone(),
            size: None,
            text: None,
            force: false,
        })))
        .unwrap();
        assert!(file.exists());
        assert!(!dir.path().join("grid.json").exists());
        assert_eq!(load_model(&file).columns(), 1);
    }

    #[test]
    fn test_set_infinite_spacing_is_cleared() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("grid.json");
        run(cli(Commands::New(NewArgs {
            file: file.clone(),
            size: None,
            text: None,
            force: false,
        })))
        .unwrap();
        run(cli(Commands::Set(SetArgs {
            file: file.clone(),
            columns: Some(2),
            rows: None,
            horizontal_spacing: Some(f64::INFINITY),
            vertical_spacing: None,
            size: None,
            text: None,
        })))
        .unwrap();
        assert_eq!(load_model(&file).horizontal_spacing(), 0.0);
    }
}
