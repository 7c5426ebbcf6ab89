use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_task_run(task: &str, status: &str, duration: Duration) {
    counter!(
        "watchtower_task_runs_total",
        "task" => task.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("watchtower_task_duration_seconds", "task" => task.to_string())
        .record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct KeyCapture {
        keys: Arc<Mutex<Vec<Key>>>,
    }

    impl KeyCapture {
        fn labels_of(&self, name: &str) -> Vec<String> {
            let keys = self.keys.lock().unwrap();
            let key = keys.iter().find(|key| key.name() == name).unwrap();
            key.labels().map(|label| label.key().to_string()).collect()
        }
    }

    impl Recorder for KeyCapture {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            self.keys.lock().unwrap().push(key.clone());
            Counter::noop()
        }

        fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
            self.keys.lock().unwrap().push(key.clone());
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            self.keys.lock().unwrap().push(key.clone());
            Histogram::noop()
        }
    }

    #[test]
    fn run_counter_carries_status_and_duration_is_per_task() {
        let capture = KeyCapture::default();

        metrics::with_local_recorder(&capture, || {
            record_task_run("respond_challenges", "completed", Duration::from_millis(5));
        });

        assert_eq!(
            capture.labels_of("watchtower_task_runs_total"),
            vec!["task", "status"]
        );
        assert_eq!(
            capture.labels_of("watchtower_task_duration_seconds"),
            vec!["task"]
        );
    }
}
