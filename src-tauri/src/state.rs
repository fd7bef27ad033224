/*
  应用运行时状态（AppState）：
  - 存储连接是整个程序唯一的共享资源：这里用 Mutex 包一层，保证任意时刻
    至多一个后台任务在碰数据库。
  - UI 在任务执行期间会禁用全部按钮，但串行化不依赖界面状态，由这把锁兜底。
*/

use std::sync::Mutex;

use rusqlite::Connection;

pub struct AppState {
    /// SQLite 连接：应用启动时打开，失败即退出（见 lib.rs 的 setup）。
    pub db: Mutex<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }
}
