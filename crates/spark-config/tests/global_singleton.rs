#![cfg(not(any(loom, spark_loom)))]
//! 进程级单例的一次性安装语义。
//!
//! 单例在整个测试进程内只能初始化一次，因此本文件只包含一个测试函数，
//! 避免与同一二进制中的其它用例争抢安装权。

use std::thread;

use spark_config::{ConfigError, ConfigStore, DeploymentProfile, SeedLayer, TypedValue};

#[test]
fn install_once_then_every_caller_shares_the_instance() {
    let store = ConfigStore::builder()
        .layer(SeedLayer::new("base").with("name", "Mike"))
        .with_profile(DeploymentProfile::new("aws", "dev", "EU_NORTH_1"))
        .build()
        .expect("seed layers are consistent");
    let installed = ConfigStore::install(store).expect("first install wins");

    let addresses: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| ConfigStore::global() as *const ConfigStore as usize))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("global() must not panic"))
            .collect()
    });
    let expected = installed as *const ConfigStore as usize;
    assert!(addresses.iter().all(|address| *address == expected));

    assert_eq!(
        ConfigStore::install(ConfigStore::new()).map(|_| ()),
        Err(ConfigError::AlreadyInstalled)
    );

    let global = ConfigStore::global();
    assert_eq!(global.get_string("name", None), Ok("Mike".to_owned()));
    global.set("name", "Jessica").expect("same-type write");
    assert_eq!(installed.get_string("name", None), Ok("Jessica".to_owned()));

    let snapshot = global.check_all_config();
    assert_eq!(snapshot.get("iaas"), Some(&TypedValue::text("aws")));
    assert_eq!(snapshot.get("env"), Some(&TypedValue::text("dev")));
    assert_eq!(snapshot.get("region"), Some(&TypedValue::text("EU_NORTH_1")));
    assert_eq!(snapshot.revision(), 1);
}
