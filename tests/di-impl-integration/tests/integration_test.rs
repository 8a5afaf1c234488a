//! 解析容器的并发集成测试
use bindery_common::{DependencyError, TypeDescriptor};
use di_abstractions::{downcast_instance, Bind, DependencyContainer, Instance, Key};
use di_impl::{Container, InstanceBinding};
use std::sync::Arc;

const TASKS: usize = 16;

fn ty(name: &str) -> TypeDescriptor {
    TypeDescriptor::named(name)
}

fn resolve_string(container: &Container<TypeDescriptor>, key: &Key<TypeDescriptor>) -> String {
    container
        .instance_of::<String>(key)
        .unwrap()
        .as_str()
        .to_string()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_fallback_is_cached_once() -> anyhow::Result<()> {
    let base = ty("Base").with_super(TypeDescriptor::unit());
    let leaf = ty("Leaf").with_super(base.clone());
    let shared: Instance = Arc::new("shared".to_string());

    let mut builder = Container::<TypeDescriptor>::builder();
    builder.bind(
        Key::new(Bind::new(ty("Handler")), base),
        Arc::new(InstanceBinding::from_instance(Arc::clone(&shared))),
    )?;
    let container = builder.build();
    let key = Key::new(Bind::new(ty("Handler")), leaf);

    let mut handles = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        let container = container.clone();
        let key = key.clone();
        handles.push(tokio::task::spawn_blocking(move || container.instance(&key)));
    }

    for handle in handles {
        let instance = handle.await??;
        // 无论哪个任务先写缓存，命中的都是同一个绑定
        assert!(Arc::ptr_eq(&instance, &shared));
    }
    assert_eq!(container.cache_len(), 1);
    assert!(container.is_cached(&key));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_roots_do_not_share_chains() {
    // 并发的根解析各自维护祖先链，相同依赖不会被误报为循环
    let config = Key::of(ty("Config"));
    let mut builder = Container::<TypeDescriptor>::builder();
    builder
        .bind_instance(config.clone(), "config".to_string())
        .unwrap();

    let mut roots = Vec::new();
    for index in 0..4 {
        let root = Key::of(ty(&format!("Service{index}")));
        let dep = config.clone();
        builder
            .bind_provider(root.clone(), move |ctx| {
                let inner = downcast_instance::<String>(ctx.instance(&dep)?)?;
                let instance: Instance = Arc::new(format!("service{index}({inner})"));
                Ok(instance)
            })
            .unwrap();
        roots.push(root);
    }
    let container = builder.build();

    let mut handles = Vec::new();
    for round in 0..TASKS {
        let container = container.clone();
        let index = round % roots.len();
        let root = roots[index].clone();
        handles.push(tokio::task::spawn_blocking(move || {
            (index, resolve_string(&container, &root))
        }));
    }

    for handle in handles {
        let (index, resolved) = handle.await.unwrap();
        assert_eq!(resolved, format!("service{index}(config)"));
    }
    // 全部为精确匹配
    assert_eq!(container.cache_len(), 0);
    assert!(container.node().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_loops_are_each_detected() {
    let a = Key::of(ty("A"));
    let b = Key::of(ty("B"));

    let mut builder = Container::<TypeDescriptor>::builder();
    let to_b = b.clone();
    builder
        .bind_provider(a.clone(), move |ctx| ctx.instance(&to_b))
        .unwrap();
    let to_a = a.clone();
    builder
        .bind_provider(b.clone(), move |ctx| ctx.instance(&to_a))
        .unwrap();
    let container = builder.build();

    let mut handles = Vec::new();
    for round in 0..TASKS {
        let container = container.clone();
        let root = if round % 2 == 0 { a.clone() } else { b.clone() };
        handles.push(tokio::task::spawn_blocking(move || {
            let result = container.instance(&root);
            (root, result)
        }));
    }

    for handle in handles {
        let (root, result) = handle.await.unwrap();
        let err = result.unwrap_err();
        let DependencyError::DependencyLoop { tree } = err else {
            panic!("expected dependency loop");
        };
        // 循环树总以本次解析的根开头，并以它结束
        let first_line = tree.lines().next().unwrap();
        assert_eq!(first_line.trim(), root.to_string());
        assert!(tree.contains(&format!("╚>{root}")));
    }
}
