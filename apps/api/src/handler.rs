//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラはリクエストの解釈とレスポンス DTO への変換だけを行い、処理はユースケースに委譲する
//!
//! ```text
//! handler.rs
//! └── handler/
//!     ├── health.rs   # GET /health
//!     ├── root.rs     # GET /api
//!     ├── heading.rs  # /api/headings
//!     └── task.rs     # /api/headings/{id}/tasks, /api/tasks/{id}
//! ```

pub mod heading;
pub mod health;
pub mod root;
pub mod task;

pub use heading::{
    HeadingState,
    create_heading,
    delete_heading,
    get_heading,
    list_headings,
    update_heading,
};
pub use health::health_check;
pub use root::api_root;
pub use task::{TaskState, create_task, delete_task, get_task, list_tasks, update_task};
