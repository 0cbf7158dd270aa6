/// Progress events emitted by the workflows, one stage at a time. A stage
/// announces how many working directories it will touch, then advances once
/// per directory.
#[derive(Debug, Clone)]
pub enum Progress {
    StageStart { name: &'static str, total: u64 },
    StageAdvance,
    StageFinish,
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn events_reach_the_callback_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|p| {
            seen.lock().unwrap().push(format!("{p:?}"));
        }));
        reporter.report(Progress::StageStart {
            name: "minimize",
            total: 3,
        });
        reporter.report(Progress::StageAdvance);
        reporter.report(Progress::StageFinish);
        drop(reporter);
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("minimize"));
    }

    #[test]
    fn reporter_without_callback_is_a_no_op() {
        ProgressReporter::new().report(Progress::StageAdvance);
    }
}
