#[cfg(test)]
mod test {
    use std::sync::Arc;

    use tempfile::tempdir;
    use tokio::sync::watch;
    use tokio::time::{timeout, Duration};

    use crate::cache::token_file::TokenCache;
    use crate::config::store::ConfigStore;
    use crate::refresh::RefreshLoop;
    use crate::tests::common::{sample_config_json, write_config, ScriptedSource};

    fn store_with_cache(dir: &tempfile::TempDir) -> (Arc<ConfigStore>, TokenCache) {
        let cache_path = dir.path().join("access_token");
        let body = sample_config_json("http://127.0.0.1:1/token", &cache_path);
        let path = write_config(dir.path(), "config.json", &body);
        (
            Arc::new(ConfigStore::open(path).expect("open store")),
            TokenCache::new(cache_path),
        )
    }

    fn shutdown() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    #[tokio::test]
    async fn unchanged_value_performs_no_write() {
        let dir = tempdir().expect("tempdir");
        let (store, cache) = store_with_cache(&dir);
        cache.write("T1").await.expect("seed cache");

        let (_tx, rx) = shutdown();
        let source = ScriptedSource::new(["T1", "T1", "T1"]);
        let refresh = RefreshLoop::new(store, source, rx);

        for _ in 0..3 {
            let wrote = refresh.run_once().await.expect("cycle");
            assert!(!wrote, "identical value must not be rewritten");
        }
        assert_eq!(cache.read().await.expect("read"), "T1");
    }

    #[tokio::test]
    async fn changed_value_is_persisted_exactly() {
        let dir = tempdir().expect("tempdir");
        let (store, cache) = store_with_cache(&dir);
        cache.write("T1").await.expect("seed cache");

        let (_tx, rx) = shutdown();
        let source = ScriptedSource::new(["T2"]);
        let refresh = RefreshLoop::new(store, source, rx);

        let wrote = refresh.run_once().await.expect("cycle");
        assert!(wrote);
        assert_eq!(cache.read().await.expect("read"), "T2");
    }

    #[tokio::test]
    async fn token_lifecycle_end_to_end() {
        let dir = tempdir().expect("tempdir");
        let (store, cache) = store_with_cache(&dir);

        // cache file absent until the initial acquisition publishes T1
        assert!(cache.read().await.is_err());
        cache.write("T1").await.expect("publish first token");
        assert_eq!(cache.read().await.expect("read"), "T1");

        let (_tx, rx) = shutdown();
        let source = ScriptedSource::new(["T1", "T2"]);
        let refresh = RefreshLoop::new(store, source, rx);

        // cycle 1: same value, untouched
        assert!(!refresh.run_once().await.expect("cycle 1"));
        assert_eq!(cache.read().await.expect("read"), "T1");

        // cycle 2: new value, rewritten
        assert!(refresh.run_once().await.expect("cycle 2"));
        assert_eq!(cache.read().await.expect("read"), "T2");
    }

    #[tokio::test]
    async fn missing_cache_file_fails_the_cycle() {
        let dir = tempdir().expect("tempdir");
        let (store, _cache) = store_with_cache(&dir);

        let (_tx, rx) = shutdown();
        let source = ScriptedSource::new(["T1"]);
        let refresh = RefreshLoop::new(store, source, rx);

        assert!(refresh.run_once().await.is_err());
    }

    #[tokio::test]
    async fn run_exits_when_shutdown_is_signalled() {
        let dir = tempdir().expect("tempdir");
        let cache_path = dir.path().join("access_token");
        let mut body = sample_config_json("http://127.0.0.1:1/token", &cache_path);
        body["refresh_interval_seconds"] = serde_json::json!(0);
        let path = write_config(dir.path(), "config.json", &body);
        let store = Arc::new(ConfigStore::open(path).expect("open store"));

        TokenCache::new(&cache_path)
            .write("T1")
            .await
            .expect("seed cache");

        let (tx, rx) = shutdown();
        let source = ScriptedSource::new(["T1"]);
        let handle = tokio::spawn(RefreshLoop::new(store, source, rx).run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).expect("signal shutdown");

        let joined = timeout(Duration::from_secs(5), handle)
            .await
            .expect("loop must stop")
            .expect("join");
        assert!(joined.is_ok());
    }
}
