//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                      | Connects to               |
//! |---------------|---------------------------------|---------------------------|
//! | `backend`     | AlarmSignalPort, DismissalPort  | backend HTTP API          |
//! | `state_file`  | AlarmSignalPort                 | shared `state.json`       |
//! | `hardware`    | LightPort, ButtonPort           | GPIO (sysfs / simulated)  |
//! | `frames`      | FramePort                       | NDJSON landmark feed      |
//! | `snapshot`    | SnapshotPort                    | `images_dir`              |
//! | `log_sink`    | EventSink                       | `log` facade              |
//! | `config_file` | ConfigPort                      | JSON config file          |
//! | `console_log` | `log::Log`                      | stderr                    |
//! | `signals`     | (none)                          | SIGINT / SIGTERM          |
//! | `time`        | (none)                          | monotonic + wall clock    |
//! | `http`        | (none)                          | TCP (HTTP/1.1 client)     |

pub mod backend;
pub mod config_file;
pub mod console_log;
pub mod frames;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod signals;
pub mod snapshot;
pub mod state_file;
pub mod time;
