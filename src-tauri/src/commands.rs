/*
  Tauri 命令集合：
  - 原则：
    1) 前端只做 UI 与参数收集
    2) 编码与数据库读写全部在 Rust 后端完成
    3) 每个涉及存储的动作都放到后台线程执行，完成后用事件把结果交回界面

  本阶段命令重点：
  - 单一数据表（messages）
  - 三个后台任务：编码入库 / 查看全部 / 清空全表
  - 任务为“发射后不管”：没有取消，也没有排队。任务执行期间前端会禁用全部
    按钮，因此不会出现并发任务；连接上的 Mutex 是最后一道保险
*/

use std::thread;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Emitter, Manager};
use tracing::{error, info};

use crate::state::AppState;
use crate::{storage, text_codec};

// =====================
// 基础命令（用于连通性）
// =====================

#[tauri::command]
pub fn health_check() -> &'static str {
    "ok"
}

// =====================
// 后台任务事件
// =====================

/// 入库任务完成事件名：前端通过 `listen` 订阅。
const EVENT_STORE_DONE: &str = "store_task_done";
/// 查看任务完成事件名：前端通过 `listen` 订阅。
const EVENT_VIEW_DONE: &str = "view_task_done";
/// 清空任务完成事件名：前端通过 `listen` 订阅。
const EVENT_CLEAR_DONE: &str = "clear_task_done";
/// 任务失败事件名（三个任务共用）：前端通过 `listen` 订阅。
const EVENT_TASK_ERROR: &str = "record_task_error";

/// 人为延迟：真实 SQL 在亚毫秒级完成，故意停一段时间让忙碌提示可见。
const STORE_TASK_DELAY: Duration = Duration::from_millis(2500);
const VIEW_TASK_DELAY: Duration = Duration::from_millis(1000);
const CLEAR_TASK_DELAY: Duration = Duration::from_millis(1000);

/// 入库任务完成事件负载：前端提示成功并清空输入框。
#[derive(Debug, Clone, Serialize)]
pub struct StoreDoneEvent {
    pub task_id: String,
}

/// 记录列表行：解码列在后台任务里算好，前端拿到即展示。
#[derive(Debug, Clone, Serialize)]
pub struct RecordRow {
    pub id: i64,
    pub encrypted: String,
    pub decrypted: String,
}

/// 查看任务完成事件负载：携带全部记录（按 id 倒序）。
#[derive(Debug, Clone, Serialize)]
pub struct ViewDoneEvent {
    pub task_id: String,
    pub records: Vec<RecordRow>,
}

/// 清空任务完成事件负载：携带删除条数。
#[derive(Debug, Clone, Serialize)]
pub struct ClearDoneEvent {
    pub task_id: String,
    pub deleted: usize,
}

/// 任务失败事件负载：stage 区分是哪个任务（store / view / clear）。
#[derive(Debug, Clone, Serialize)]
pub struct TaskErrorEvent {
    pub task_id: String,
    pub stage: String,
    pub message: String,
}

/// 任务启动返回：task_id 用于前端只处理“当前任务”的事件。
#[derive(Debug, Serialize)]
pub struct TaskStartResponse {
    pub task_id: String,
}

/// 生成随机任务 ID。
///
/// 说明：
/// - 不引入额外 uuid 依赖，直接用 16 字节随机数 + Base64。
fn generate_task_id() -> String {
    let mut buf = [0u8; 16];
    OsRng.fill_bytes(&mut buf);
    B64.encode(buf)
}

/// 在后台线程内拿到数据库连接并执行 f；把锁异常统一收敛成字符串错误。
fn with_db<T>(
    app: &AppHandle,
    f: impl FnOnce(&rusqlite::Connection) -> Result<T, storage::StorageError>,
) -> Result<T, String> {
    let state = app.state::<AppState>();
    let conn = state
        .db
        .lock()
        .map_err(|_| "internal error: storage lock is unavailable".to_string())?;
    f(&conn).map_err(|e| e.to_string())
}

/// 任务失败的统一出口：记录日志并把错误交回前端。
fn emit_task_error(app: &AppHandle, task_id: &str, stage: &str, message: String) {
    error!(stage, error = %message, "record task failed");
    let _ = app.emit(
        EVENT_TASK_ERROR,
        TaskErrorEvent {
            task_id: task_id.to_string(),
            stage: stage.to_string(),
            message,
        },
    );
}

// =====================
// 入库校验
// =====================

/// 入库前的文本校验：拒绝空/纯空白输入，返回修剪后的文本。
fn normalize_store_text(input: &str) -> Result<String, String> {
    let text = input.trim();
    if text.is_empty() {
        return Err("Input cannot be empty!".to_string());
    }
    Ok(text.to_string())
}

// =====================
// 编码入库（后台执行）
// =====================

/// 入库请求：前端只传原始文本，编码在后端完成。
#[derive(Debug, Deserialize)]
pub struct StoreTextRequest {
    pub text: String,
}

/// 启动“编码并入库”任务（后台线程执行，前端通过事件拿结果）。
///
/// 失败时前端保留输入框内容，用户可直接重试。
#[tauri::command]
pub fn store_text_start(app: AppHandle, req: StoreTextRequest) -> Result<TaskStartResponse, String> {
    // 空输入在任务启动前就拒绝：不产生任务，也不触碰数据库。
    let text = normalize_store_text(&req.text)?;

    let task_id = generate_task_id();

    let app2 = app.clone();
    let task_id2 = task_id.clone();
    thread::spawn(move || {
        thread::sleep(STORE_TASK_DELAY);

        let token = text_codec::encode_text(&text);
        match with_db(&app2, |conn| storage::insert_message(conn, &token)) {
            Ok(()) => {
                let _ = app2.emit(
                    EVENT_STORE_DONE,
                    StoreDoneEvent {
                        task_id: task_id2.clone(),
                    },
                );
            }
            Err(e) => emit_task_error(&app2, &task_id2, "store", e),
        }
    });

    Ok(TaskStartResponse { task_id })
}

// =====================
// 查看全部记录（后台执行）
// =====================

/// 启动“查询并解码全部记录”任务。
///
/// 解码在后台任务里完成：坏数据会变成占位文本（见 text_codec），查看永不报错。
#[tauri::command]
pub fn records_view_start(app: AppHandle) -> Result<TaskStartResponse, String> {
    let task_id = generate_task_id();

    let app2 = app.clone();
    let task_id2 = task_id.clone();
    thread::spawn(move || {
        thread::sleep(VIEW_TASK_DELAY);

        match with_db(&app2, storage::list_messages) {
            Ok(records) => {
                let rows = records
                    .into_iter()
                    .map(|r| {
                        let decrypted = text_codec::decode_text(&r.encrypted);
                        RecordRow {
                            id: r.id,
                            encrypted: r.encrypted,
                            decrypted,
                        }
                    })
                    .collect::<Vec<_>>();

                let _ = app2.emit(
                    EVENT_VIEW_DONE,
                    ViewDoneEvent {
                        task_id: task_id2.clone(),
                        records: rows,
                    },
                );
            }
            Err(e) => emit_task_error(&app2, &task_id2, "view", e),
        }
    });

    Ok(TaskStartResponse { task_id })
}

// =====================
// 清空全表（后台执行）
// =====================

/// 启动“清空全部记录”任务：二次确认由前端在调用前完成。
#[tauri::command]
pub fn records_clear_start(app: AppHandle) -> Result<TaskStartResponse, String> {
    let task_id = generate_task_id();

    let app2 = app.clone();
    let task_id2 = task_id.clone();
    thread::spawn(move || {
        thread::sleep(CLEAR_TASK_DELAY);

        match with_db(&app2, storage::clear_messages) {
            Ok(deleted) => {
                info!(deleted, "cleared all records");
                let _ = app2.emit(
                    EVENT_CLEAR_DONE,
                    ClearDoneEvent {
                        task_id: task_id2.clone(),
                        deleted,
                    },
                );
            }
            Err(e) => emit_task_error(&app2, &task_id2, "clear", e),
        }
    });

    Ok(TaskStartResponse { task_id })
}
