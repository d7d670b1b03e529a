use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use spark_config::{ConfigStore, SeedLayer};

fn seeded() -> ConfigStore {
    let mut base = SeedLayer::new("base").with("name", "Mike").with("port", 8080);
    for index in 0..64 {
        base.insert(format!("feature.{index}.enabled"), index % 2 == 0);
    }
    ConfigStore::builder()
        .layer(base)
        .build()
        .expect("bench seed is consistent")
}

/// 热路径读取基准。
///
/// # 设计目的（Why）
/// - 读取是绝对主导的访问模式，这里度量一次读锁加一次哈希查找与克隆的成本。
///
/// # 执行逻辑（How）
/// - 分别覆盖字符串（需要分配）与整数（无分配）两类属性，以及带默认值的缺失路径。
fn bench_reads(c: &mut Criterion) {
    let store = seeded();
    c.bench_function("get_string/hit", |b| {
        b.iter(|| store.get_string(black_box("name"), None))
    });
    c.bench_function("get_integer/hit", |b| {
        b.iter(|| store.get_integer(black_box("port"), None))
    });
    c.bench_function("get_integer/default", |b| {
        b.iter(|| store.get_integer(black_box("timeout"), Some(30)))
    });
}

/// 同类型替换写入的成本，包含写锁与旧值回收。
fn bench_writes(c: &mut Criterion) {
    let store = seeded();
    let mut port = 0_i64;
    c.bench_function("set/replace_integer", |b| {
        b.iter(|| {
            port = port.wrapping_add(1);
            store.set(black_box("port"), port)
        })
    });
}

/// 全量快照的成本随属性数量线性增长；此处固定为 66 个属性。
fn bench_snapshot(c: &mut Criterion) {
    let store = seeded();
    c.bench_function("check_all_config/66", |b| b.iter(|| store.check_all_config()));
}

criterion_group!(store_benches, bench_reads, bench_writes, bench_snapshot);
criterion_main!(store_benches);
