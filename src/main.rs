use anyhow::{Context, Result};
use atspi_bind::atspi::{Accessible, AtspiFunctions, CoordType, ErrorSlot, Rect};
use atspi_bind::config::AppConfig;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "atspi-bind", about = "AT-SPI 无障碍库绑定诊断工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 查找 libatspi 并打印解析结果
    Locate,
    /// 加载绑定，打印桌面根元素及其直接子元素
    Desktop {
        /// 桌面序号
        #[arg(short, long, default_value_t = 0)]
        index: i32,
        /// 坐标系: screen | window
        #[arg(long, default_value = "screen")]
        coords: CoordType,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 解析矩形 "l,t,r,b" 并打印宽高与中点
    Rect {
        /// 边界值，逗号分隔
        #[arg(allow_hyphen_values = true)]
        edges: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：此时全局订阅者尚未初始化，使用临时订阅者输出查找日志
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || match &cli.config {
        Some(path) => AppConfig::load(std::path::Path::new(path)),
        None => Ok(AppConfig::load_or_default()),
    })?;

    // 初始化日志
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.general.log_level.parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Locate => cmd_locate(&config),
        Commands::Desktop { index, coords, json } => cmd_desktop(&config, index, coords, json),
        Commands::Rect { edges } => cmd_rect(&edges),
    }
}

/// 按配置加载绑定：显式路径优先，否则查询共享库缓存
fn load_binding(config: &AppConfig) -> Result<AtspiFunctions> {
    let functions = match &config.library.path {
        Some(path) => AtspiFunctions::open(path),
        None => AtspiFunctions::discover(&config.library.discovery()),
    };
    Ok(functions?)
}

fn cmd_locate(config: &AppConfig) -> Result<()> {
    if let Some(path) = &config.library.path {
        println!("{} (configured)", path);
        return Ok(());
    }

    let discovery = config.library.discovery();
    match discovery.find_library()? {
        Some(path) => println!("{}", path),
        None => anyhow::bail!("no '{}' entry found via {} -p", discovery.token, discovery.tool),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ElementReport {
    name: Option<String>,
    role: Option<String>,
    id: i32,
    process_id: u32,
    child_count: i32,
    extents: Option<Rect>,
    errors: u32,
}

impl ElementReport {
    fn collect(atspi: &AtspiFunctions, obj: Accessible, coords: CoordType) -> Self {
        let mut slot = ErrorSlot::new();
        let mut errors = 0;
        // 每次调用后检查并释放，槽位不能带着旧错误进入下一次调用
        let mut check = |slot: &mut ErrorSlot| {
            if slot.is_set() {
                errors += 1;
                atspi.clear_error(slot);
            }
        };

        let name = atspi.name(obj, Some(&mut slot));
        check(&mut slot);
        let role = atspi.role_name(obj, Some(&mut slot));
        check(&mut slot);
        let id = atspi.id(obj, Some(&mut slot));
        check(&mut slot);
        let process_id = atspi.process_id(obj, Some(&mut slot));
        check(&mut slot);
        let child_count = atspi.child_count(obj, Some(&mut slot));
        check(&mut slot);
        let extents = atspi
            .component(obj)
            .and_then(|comp| atspi.rectangle(comp, coords, Some(&mut slot)));
        check(&mut slot);

        Self {
            name,
            role,
            id,
            process_id,
            child_count,
            extents,
            errors,
        }
    }

    fn print(&self, indent: &str) {
        let extents = match &self.extents {
            Some(rect) => rect.to_string(),
            None => "-".to_string(),
        };
        println!(
            "{}{:<32} {:<16} pid={:<8} children={:<4} {}",
            indent,
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.role.as_deref().unwrap_or("-"),
            self.process_id,
            self.child_count,
            extents
        );
    }
}

#[derive(Debug, Serialize)]
struct DesktopReport {
    library: String,
    desktop: ElementReport,
    children: Vec<ElementReport>,
}

/// 打印桌面根元素和直接子元素（不递归）
fn cmd_desktop(config: &AppConfig, index: i32, coords: CoordType, json: bool) -> Result<()> {
    let atspi = load_binding(config)?;
    let desktop = atspi
        .desktop(index)
        .with_context(|| format!("atspi_get_desktop({}) returned null", index))?;

    let root = ElementReport::collect(&atspi, desktop, coords);
    let children: Vec<_> = (0..root.child_count.max(0))
        .filter_map(|i| atspi.child_at_index(desktop, i, None))
        .map(|child| ElementReport::collect(&atspi, child, coords))
        .collect();
    info!("Desktop {} has {} reachable children", index, children.len());

    let report = DesktopReport {
        library: atspi.path().to_string(),
        desktop: root,
        children,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("library: {}", report.library);
        report.desktop.print("");
        for child in &report.children {
            child.print("  ");
        }
    }
    Ok(())
}

fn cmd_rect(edges: &str) -> Result<()> {
    let rect: Rect = edges.parse()?;
    let mid = rect.mid_point();
    println!("{}", rect);
    println!("width={} height={} mid=({}, {})", rect.width(), rect.height(), mid.x, mid.y);
    Ok(())
}
