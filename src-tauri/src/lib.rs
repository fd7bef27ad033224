/*
  Tauri 后端入口（Rust）：
  - 需求要求：界面只负责布局与按钮事件，编码与数据库读写必须放在后端（Rust）执行。
  - 这里注册所有可被前端 invoke 的命令，初始化日志与对话框插件，并在 setup 阶段
    打开数据库：打开失败属于致命错误，弹窗提示用户后直接退出进程。
*/

mod commands;
mod state;
mod storage;
mod text_codec;

use tauri::Manager;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use state::AppState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // 日志：默认 info，可用 RUST_LOG 覆盖。
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    tauri::Builder::default()
        // 插件：
        // - dialog：原生消息/确认对话框（空输入警告、成功/失败提示、删除与退出确认）
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            // 打开（或创建）数据库并建表：失败时必须让用户看到，不能只写日志。
            let conn = match storage::open(app.handle()) {
                Ok(conn) => conn,
                Err(e) => {
                    error!(error = %e, "database initialization failed");
                    app.dialog()
                        .message(format!("Database connection failed!\n{e}"))
                        .title("Fatal Error")
                        .kind(MessageDialogKind::Error)
                        .blocking_show();
                    std::process::exit(1);
                }
            };

            if let Ok(path) = storage::database_path(app.handle()) {
                info!(path = %path.display(), "database ready");
            }

            // 管理应用状态：数据库连接全程唯一，由 Mutex 串行化访问。
            app.manage(AppState::new(conn));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 基础连通性
            commands::health_check,
            // 编码入库 / 查看 / 清空（后台执行）
            commands::store_text_start,
            commands::records_view_start,
            commands::records_clear_start,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时发生错误");
}
