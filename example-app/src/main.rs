//! # 示例应用程序
//!
//! 演示解析容器的层级回退、覆盖链与依赖循环报告

use bindery_common::TypeDescriptor;
use clap::Parser;
use di_abstractions::{
    downcast_instance, Bind, ContainerRef, DependencyContainer, Instance, Key,
};
use di_impl::{load_container_config, Container};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Bindery 解析容器示例")]
struct Args {
    /// 配置文件路径（可选，未给出时只读取 BINDERY_ 环境变量）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .init();

    info!("启动 Bindery 示例应用");

    let container = build_container(&args)?;
    info!("已注册的绑定:\n{}", container.describe_bindings());

    demonstrate_fallback(&container)?;
    demonstrate_overrides(&container)?;
    demonstrate_loop(&container);

    info!("示例结束，回退缓存条目数: {}", container.cache_len());
    Ok(())
}

/// 示例中使用的类型层级
struct Types {
    handler: TypeDescriptor,
    event: TypeDescriptor,
    click: TypeDescriptor,
    list: TypeDescriptor,
    greeter: TypeDescriptor,
}

impl Types {
    fn new() -> Self {
        let event = TypeDescriptor::named("Event").with_super(TypeDescriptor::unit());
        let click = TypeDescriptor::named("ClickEvent")
            .with_interface(TypeDescriptor::named("Serializable"))
            .with_super(event.clone());

        Self {
            handler: TypeDescriptor::named("Handler"),
            event,
            click,
            list: TypeDescriptor::named("List"),
            greeter: TypeDescriptor::named("Greeter"),
        }
    }

    fn handler_for(&self, arg: TypeDescriptor) -> Key<TypeDescriptor> {
        Key::new(Bind::new(self.handler.clone()), arg)
    }
}

/// 构建容器
fn build_container(args: &Args) -> anyhow::Result<Container<TypeDescriptor>> {
    info!("构建解析容器");

    let config = load_container_config(args.config.as_deref())?;
    info!("容器配置: {:?}", config);

    let types = Types::new();
    let mut builder = Container::<TypeDescriptor>::builder().with_config(config)?;

    builder.bind_instance(types.handler_for(types.event.clone()), "通用事件处理器".to_string())?;
    builder.bind_instance(types.handler_for(types.list.clone()), "列表处理器".to_string())?;

    let greeter = Key::of(types.greeter.clone());
    builder.bind_provider(greeter.clone(), |_ctx| Ok(text("你好")))?;
    builder.override_provider(greeter.clone(), |ctx| decorate(ctx, "[日志]"))?;
    builder.override_provider(greeter, |ctx| decorate(ctx, "[计时]"))?;

    let a = Key::of(TypeDescriptor::named("ServiceA"));
    let b = Key::of(TypeDescriptor::named("ServiceB"));
    let to_b = b.clone();
    builder.bind_provider(a.clone(), move |ctx| ctx.instance(&to_b))?;
    builder.bind_provider(b, move |ctx| ctx.instance(&a))?;

    Ok(builder.build())
}

/// 演示层级回退
fn demonstrate_fallback(container: &Container<TypeDescriptor>) -> anyhow::Result<()> {
    info!("演示层级回退");
    let types = Types::new();

    // ClickEvent 没有直接绑定，沿父类型找到 Event 的处理器
    let click = types.handler_for(types.click.clone());
    let handler = container.instance_of::<String>(&click)?;
    info!("{} -> {}", click, handler);

    // 参数化类型回退到原始类型
    let strings = types.handler_for(types.list.parameterized([TypeDescriptor::named("String")]));
    let handler = container.instance_of::<String>(&strings)?;
    info!("{} -> {}", strings, handler);

    let missing = types.handler_for(TypeDescriptor::named("Unknown"));
    if let Err(e) = container.factory(&missing, None) {
        warn!("预期中的解析失败: {}", e);
    }
    Ok(())
}

/// 演示覆盖链
fn demonstrate_overrides(container: &Container<TypeDescriptor>) -> anyhow::Result<()> {
    info!("演示覆盖链");
    let types = Types::new();
    let greeter = Key::of(types.greeter);

    let primary = container.instance_of::<String>(&greeter)?;
    info!("主绑定: {}", primary);

    let decorated = container.overridden_factory(&greeter, None, 0)?;
    let value = downcast_instance::<String>(decorated(Arc::new(()))?)?;
    info!("覆盖链结果: {}", value);
    Ok(())
}

/// 演示依赖循环报告
fn demonstrate_loop(container: &Container<TypeDescriptor>) {
    info!("演示依赖循环检测");
    let a = Key::of(TypeDescriptor::named("ServiceA"));
    match container.instance(&a) {
        Ok(_) => warn!("未检测到循环"),
        Err(e) => info!("{}", e),
    }
}

/// 在下一层覆盖的结果外包一层标记，覆盖链到底时使用基础问候语
fn decorate(ctx: &ContainerRef<TypeDescriptor>, tag: &str) -> bindery_common::DependencyResult<Instance> {
    let inner = match ctx.overridden_factory_of_current(None)? {
        Some(next) => downcast_instance::<String>(next(Arc::new(()))?)?
            .as_str()
            .to_string(),
        None => "你好".to_string(),
    };
    Ok(text(&format!("{tag}{inner}")))
}

fn text(value: &str) -> Instance {
    Arc::new(value.to_string())
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
