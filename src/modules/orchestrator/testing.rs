//! 测试用的进程执行器与通知器

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::modules::notifier::{Notifier, NotifyKind};
use crate::modules::runner::{ProcessOutput, ProcessRunner};

/// 预设的进程行为
pub enum Step {
    Output(ProcessOutput),
    /// 永不结束，future 被丢弃时设置标记
    Hang(Arc<AtomicBool>),
}

struct KilledOnDrop(Arc<AtomicBool>);

impl Drop for KilledOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// 按顺序返回预设结果并记录每次调用的 argv
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    steps: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedRunner {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> ProcessOutput {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().cloned());
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(argv);

        let step = self
            .steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match step {
            Some(Step::Output(output)) => output,
            Some(Step::Hang(flag)) => {
                let _guard = KilledOnDrop(flag);
                std::future::pending::<ProcessOutput>().await
            }
            None => panic!("没有为 {} 预设结果", program),
        }
    }
}

/// 记录收到的通知
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(NotifyKind, String)>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(NotifyKind, String)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotifyKind, subject: &str) {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((kind, subject.to_string()));
    }
}

pub fn ok(program: &str, stdout: &str) -> Step {
    Step::Output(ProcessOutput::exited(program, 0, stdout))
}

pub fn exit(program: &str, code: i32) -> Step {
    Step::Output(ProcessOutput::exited(program, code, ""))
}

pub fn argv(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
