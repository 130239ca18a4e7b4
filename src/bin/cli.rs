use clap::{Parser, ValueEnum};
use rpg_mapgen::{GeneratorSettings, MapSize, generate_map};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    Small,
    Medium,
    Large,
    Huge,
}

impl From<SizeArg> for MapSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => MapSize::Small,
            SizeArg::Medium => MapSize::Medium,
            SizeArg::Large => MapSize::Large,
            SizeArg::Huge => MapSize::Huge,
        }
    }
}

/// Генератор карты мира для RPG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long, conflicts_with = "size")]
    config: Option<PathBuf>,

    /// Готовый размер карты вместо конфигурационного файла
    #[arg(long, value_enum)]
    size: Option<SizeArg>,

    /// Сид (перекрывает значение из конфигурации)
    #[arg(long)]
    seed: Option<u64>,

    /// Путь для сохранения карты в JSON (по умолчанию: ./map.json)
    #[arg(short, long, default_value = "map.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let mut settings = match (&cli.config, cli.size) {
        (Some(path), _) => {
            let path = path.to_str().ok_or("config path is not valid UTF-8")?;
            GeneratorSettings::from_toml_file(path)?
        }
        (None, Some(size)) => GeneratorSettings::for_size(size.into()),
        (None, None) => GeneratorSettings::default(),
    };
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    println!(
        "Генерация карты (размер: {}×{}, вода: {:?})...",
        settings.width, settings.height, settings.water_algorithm
    );
    let grid = generate_map(settings)?;

    let summary = grid.summary();
    println!("Биомы:");
    for (biome, count) in &summary.biomes {
        println!("  {biome:?}: {count}");
    }
    println!("Рельеф:");
    for (relief, count) in &summary.reliefs {
        println!("  {relief:?}: {count}");
    }
    println!(
        "Поселений: {}, подземелий: {}, клеток с дорогой: {}, максимальный уровень: {}",
        summary.settlements, summary.dungeons, summary.road_cells, summary.max_level
    );

    println!("Сохранение в {:?}", cli.output);
    fs::write(&cli.output, grid.to_json()?)?;

    println!("\nГотово! Карта сохранена.");
    Ok(())
}
