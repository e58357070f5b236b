use crate::engine::critical::{CriticalActionExecutor, TerminatedProcess, select_victim};
use crate::engine::errors::{CriticalActionError, NotifyError, SamplerError};
use crate::engine::types::{ProcessUsage, Sample};
use crate::notify::Notifier;
use crate::sampler::Sampler;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted samples; a `None` entry simulates a sampler failure.
/// Each returned sample is re-stamped with the tick time.
#[derive(Default)]
pub struct FakeSampler {
    script: VecDeque<Option<Sample>>,
}

impl FakeSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.script.push_back(Some(sample));
    }

    pub fn push_failure(&mut self) {
        self.script.push_back(None);
    }
}

impl Sampler for FakeSampler {
    fn sample(&mut self, now: DateTime<Utc>) -> Result<Sample, SamplerError> {
        match self.script.pop_front() {
            Some(Some(mut sample)) => {
                sample.timestamp = now;
                Ok(sample)
            }
            Some(None) => Err(SamplerError::Other("scripted failure".to_string())),
            None => Err(SamplerError::NoProcesses),
        }
    }
}

/// Sampler that always repeats one sample shape; usage is fed through a shared handle.
#[derive(Clone)]
pub struct SharedSampler {
    pub next: Arc<Mutex<Option<Sample>>>,
}

impl SharedSampler {
    pub fn new() -> Self {
        Self {
            next: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set(&self, sample: Option<Sample>) {
        *self.next.lock().unwrap() = sample;
    }
}

impl Sampler for SharedSampler {
    fn sample(&mut self, now: DateTime<Utc>) -> Result<Sample, SamplerError> {
        match self.next.lock().unwrap().clone() {
            Some(mut sample) => {
                sample.timestamp = now;
                Ok(sample)
            }
            None => Err(SamplerError::Other("no sample configured".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Records every send; optionally fails for some recipients.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().push(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.failing.lock().unwrap().iter().any(|r| r == recipient) {
            return Err(NotifyError::Command("scripted failure".to_string()));
        }
        Ok(())
    }
}

/// Records termination requests instead of signalling anything.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    pub calls: Arc<Mutex<Vec<Vec<ProcessUsage>>>>,
    pub fail: bool,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CriticalActionExecutor for FakeExecutor {
    fn terminate(
        &mut self,
        candidates: &[ProcessUsage],
    ) -> Result<TerminatedProcess, CriticalActionError> {
        self.calls.lock().unwrap().push(candidates.to_vec());
        if self.fail {
            return Err(CriticalActionError::NoCandidate);
        }
        select_victim(candidates)
            .map(TerminatedProcess::from)
            .ok_or(CriticalActionError::NoCandidate)
    }
}
