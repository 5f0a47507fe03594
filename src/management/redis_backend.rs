use redis::aio::MultiplexedConnection;

use crate::{Res, management::KvBackend};

/// Record store backend talking to a Redis server.
pub struct RedisBackend {
    conn: MultiplexedConnection,
}

impl RedisBackend {
    /// Opens the connection and checks it with a `PING`.
    pub async fn connect(url: &str) -> Res<Self> {
        let client = redis::Client::open(url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(Self { conn })
    }
}

impl KvBackend for RedisBackend {
    async fn set(&mut self, key: &str, value: Vec<u8>) -> Res<()> {
        // no expiry: records live until overwritten
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async::<()>(&mut self.conn)
            .await?;
        Ok(())
    }

    async fn get(&mut self, key: &str) -> Res<Option<Vec<u8>>> {
        Ok(redis::cmd("GET")
            .arg(key)
            .query_async::<Option<Vec<u8>>>(&mut self.conn)
            .await?)
    }

    async fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> Res<(u64, Vec<String>)> {
        Ok(redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async::<(u64, Vec<String>)>(&mut self.conn)
            .await?)
    }
}
