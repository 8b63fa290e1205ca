//! Benchmark runner state machine
//!
//! A run moves through
//! `Idle -> PerAdapterSetup -> Validating -> Benchmarking -> Reporting -> Done`.
//! Setup or validation failure of any registered codec moves the runner to
//! `Aborted` before a single trial is timed. Everything executes on the
//! calling thread, one triple at a time.

use super::bench_alloc::AllocationSnapshot;
use super::bench_report::{BenchmarkReport, BenchmarkResult, EncodedSize, TrialFailure};
use super::bench_stats::Summary;
use super::Operation;
use crate::codec::{Codec, DatasetCodec};
use crate::dataset::{Dataset, Shape};
use crate::error::{CodecError, CodecResult, Error, Result, ValidationError};
use crate::model::Container;
use crate::validation::RoundTripValidator;
use chrono::Utc;
use std::fmt;
use std::hint::black_box;
use std::time::Instant;
use uuid::Uuid;

/// Runner lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Codecs may be registered
    Idle,
    /// Pre-encoding inputs for the deserialize trials
    PerAdapterSetup,
    /// Round-trip checks of every codec
    Validating,
    /// Terminal: a codec failed setup or validation
    Aborted,
    /// Timed trials
    Benchmarking,
    /// Aggregating samples
    Reporting,
    /// Terminal: the report was produced
    Done,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Trial counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Timed trials per triple
    pub iterations: usize,
    /// Untimed calls before the trials of each triple
    pub warmup_iterations: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            iterations: 100,
            warmup_iterations: 10,
        }
    }
}

/// Encoded inputs prepared before any timing
struct EncodedInputs {
    separate: Vec<u8>,
    single: Vec<u8>,
}

impl EncodedInputs {
    fn prepare<C, D>(codec: &D, dataset: &Dataset<C>) -> std::result::Result<Self, ValidationError>
    where
        C: Container,
        D: DatasetCodec<C> + ?Sized,
    {
        let failure = |shape: Shape| {
            move |source: CodecError| ValidationError::Codec {
                codec: codec.name().to_string(),
                shape: shape.to_string(),
                source,
            }
        };
        Ok(Self {
            separate: Codec::<C::Item>::serialize_many(codec, dataset.separate()).map_err(failure(Shape::Separate))?,
            single: Codec::<C>::serialize_one(codec, dataset.single()).map_err(failure(Shape::Single))?,
        })
    }

    fn size(&self, codec: &'static str, framing: usize) -> EncodedSize {
        EncodedSize {
            codec,
            separate: self.separate.len(),
            single: self.single.len(),
            framing,
        }
    }
}

/// Raw per-trial samples of one triple
struct Samples {
    elapsed_ns: Vec<f64>,
    allocated_bytes: Vec<f64>,
    allocations: Vec<f64>,
}

impl Samples {
    fn with_capacity(iterations: usize) -> Self {
        Self {
            elapsed_ns: Vec::with_capacity(iterations),
            allocated_bytes: Vec::with_capacity(iterations),
            allocations: Vec::with_capacity(iterations),
        }
    }

    fn len(&self) -> usize {
        self.elapsed_ns.len()
    }
}

/// Drives registered codecs over one dataset
pub struct BenchmarkRunner<C: Container> {
    codecs: Vec<Box<dyn DatasetCodec<C>>>,
    options: RunnerOptions,
    state: RunnerState,
}

impl<C: Container> BenchmarkRunner<C> {
    /// Create an idle runner
    pub fn new(options: RunnerOptions) -> Self {
        Self {
            codecs: Vec::new(),
            options,
            state: RunnerState::Idle,
        }
    }

    /// Add a codec; ignored unless the runner is idle
    pub fn register(&mut self, codec: Box<dyn DatasetCodec<C>>) -> &mut Self {
        if self.state == RunnerState::Idle {
            self.codecs.push(codec);
        } else {
            tracing::warn!(codec = codec.name(), state = %self.state, "runner not idle, codec ignored");
        }
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Names of the registered codecs, in registration order
    pub fn codec_names(&self) -> Vec<&'static str> {
        self.codecs.iter().map(|codec| codec.name()).collect()
    }

    fn transition(&mut self, next: RunnerState) {
        tracing::debug!(from = %self.state, to = %next, "runner state");
        self.state = next;
    }

    fn abort(&mut self, error: ValidationError) -> Error {
        tracing::error!(codec = error.codec(), shape = error.shape(), %error, "benchmark aborted");
        self.transition(RunnerState::Aborted);
        error.into()
    }

    /// Validate every codec, then time every triple
    ///
    /// Returns the validation error of the first failing codec, leaving the
    /// runner [`RunnerState::Aborted`]. A runner runs once; later calls fail.
    pub fn run(&mut self, dataset: &Dataset<C>) -> Result<BenchmarkReport> {
        if self.state != RunnerState::Idle {
            return Err(Error::configuration(format!(
                "runner already used (state {})",
                self.state
            )));
        }
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(%run_id, codecs = ?self.codec_names(), records = dataset.len(), "benchmark run started");

        self.transition(RunnerState::PerAdapterSetup);
        let prepared: std::result::Result<Vec<EncodedInputs>, ValidationError> = self
            .codecs
            .iter()
            .map(|codec| -> std::result::Result<EncodedInputs, ValidationError> {
                let inputs = EncodedInputs::prepare(codec.as_ref(), dataset)?;
                tracing::info!(
                    codec = codec.name(),
                    separate_bytes = inputs.separate.len(),
                    single_bytes = inputs.single.len(),
                    "codec prepared"
                );
                Ok(inputs)
            })
            .collect();
        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(error) => return Err(self.abort(error)),
        };

        self.transition(RunnerState::Validating);
        let validation = self.codecs.iter().try_for_each(|codec| {
            RoundTripValidator::check(codec.as_ref(), dataset)?;
            tracing::info!(codec = codec.name(), "round trip validated");
            Ok::<(), ValidationError>(())
        });
        if let Err(error) = validation {
            return Err(self.abort(error));
        }

        self.transition(RunnerState::Benchmarking);
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for (codec, inputs) in self.codecs.iter().zip(&prepared) {
            self.bench_codec(codec.as_ref(), dataset, inputs, &mut results, &mut failures);
        }

        self.transition(RunnerState::Reporting);
        let report = BenchmarkReport {
            run_id,
            started_at,
            records: dataset.len(),
            iterations: self.options.iterations,
            warmup_iterations: self.options.warmup_iterations,
            sizes: self
                .codecs
                .iter()
                .zip(&prepared)
                .map(|(codec, inputs)| inputs.size(codec.name(), codec.frame_prefix_bytes() * dataset.len()))
                .collect(),
            results,
            failures,
        };

        self.transition(RunnerState::Done);
        tracing::info!(%run_id, results = report.results.len(), failures = report.failures.len(), "benchmark run finished");
        Ok(report)
    }

    /// Time all four triples of one codec, stopping at the first error
    fn bench_codec(
        &self,
        codec: &dyn DatasetCodec<C>,
        dataset: &Dataset<C>,
        inputs: &EncodedInputs,
        results: &mut Vec<BenchmarkResult>,
        failures: &mut Vec<TrialFailure>,
    ) {
        for operation in Operation::ALL {
            for shape in Shape::ALL {
                tracing::debug!(codec = codec.name(), %operation, %shape, "trials started");
                let samples = match (operation, shape) {
                    (Operation::Serialize, Shape::Separate) => {
                        self.measure(|| Codec::<C::Item>::serialize_many(codec, dataset.separate()))
                    }
                    (Operation::Serialize, Shape::Single) => {
                        self.measure(|| Codec::<C>::serialize_one(codec, dataset.single()))
                    }
                    (Operation::Deserialize, Shape::Separate) => {
                        self.measure(|| Codec::<C::Item>::deserialize_many(codec, &inputs.separate))
                    }
                    (Operation::Deserialize, Shape::Single) => {
                        self.measure(|| Codec::<C>::deserialize_one(codec, &inputs.single))
                    }
                };

                match samples {
                    Ok(samples) => results.push(BenchmarkResult {
                        codec: codec.name().to_string(),
                        shape,
                        operation,
                        iterations: samples.len(),
                        time_ns: Summary::from_samples(&samples.elapsed_ns),
                        allocated_bytes: Summary::from_samples(&samples.allocated_bytes),
                        allocations: Summary::from_samples(&samples.allocations),
                        encoded_bytes: inputs.size(codec.name(), codec.frame_prefix_bytes() * dataset.len()).of(shape),
                    }),
                    Err((completed, error)) => {
                        tracing::warn!(codec = codec.name(), %operation, %shape, completed, %error, "trial failed, skipping remaining trials");
                        failures.push(TrialFailure {
                            codec: codec.name().to_string(),
                            shape,
                            operation,
                            completed,
                            error: error.to_string(),
                        });
                        return;
                    }
                }
            }
        }
    }

    /// Warm up, then time `call` once per iteration
    ///
    /// On error returns the number of completed timed trials and the error.
    fn measure<R>(&self, mut call: impl FnMut() -> CodecResult<R>) -> std::result::Result<Samples, (usize, CodecError)> {
        for _ in 0..self.options.warmup_iterations {
            drop(black_box(call().map_err(|e| (0, e))?));
        }

        let mut samples = Samples::with_capacity(self.options.iterations);
        for completed in 0..self.options.iterations {
            let before = AllocationSnapshot::take();
            let start = Instant::now();
            let outcome = call();
            let elapsed = start.elapsed();
            let allocated = AllocationSnapshot::take().since(&before);

            let value = outcome.map_err(|e| (completed, e))?;
            drop(black_box(value));

            samples.elapsed_ns.push(elapsed.as_nanos() as f64);
            samples.allocated_bytes.push(allocated.bytes as f64);
            samples.allocations.push(allocated.count as f64);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecKind, JsonCodec};
    use crate::dataset::SyntheticDatasetProvider;
    use crate::model::SalesItemContainer;

    fn dataset(rows: usize) -> Dataset<SalesItemContainer> {
        Dataset::load(&SyntheticDatasetProvider::new(rows, 11)).unwrap()
    }

    fn options() -> RunnerOptions {
        RunnerOptions {
            iterations: 3,
            warmup_iterations: 1,
        }
    }

    #[test]
    fn test_run_produces_every_triple() {
        let mut runner = BenchmarkRunner::<SalesItemContainer>::new(options());
        runner.register(Box::new(JsonCodec::new()));
        assert_eq!(runner.state(), RunnerState::Idle);

        let report = runner.run(&dataset(10)).unwrap();
        assert_eq!(runner.state(), RunnerState::Done);
        assert_eq!(report.results.len(), 4);
        assert!(report.failures.is_empty());
        for result in &report.results {
            assert_eq!(result.iterations, 3);
            assert!(result.encoded_bytes > 0);
        }
        assert_eq!(report.size(CodecKind::Json.name()).map(|s| s.single > 0), Some(true));
    }

    #[test]
    fn test_runner_runs_once() {
        let mut runner = BenchmarkRunner::<SalesItemContainer>::new(options());
        runner.run(&dataset(2)).unwrap();
        assert!(runner.run(&dataset(2)).is_err());
        assert_eq!(runner.state(), RunnerState::Done);
    }

    #[test]
    fn test_register_only_while_idle() {
        let mut runner = BenchmarkRunner::<SalesItemContainer>::new(options());
        runner
            .register(Box::new(JsonCodec::new()))
            .register(Box::new(crate::codec::BincodeCodec::new()));
        assert_eq!(runner.codec_names(), vec!["json", "bincode"]);

        runner.run(&dataset(2)).unwrap();
        runner.register(Box::new(JsonCodec::new()));
        assert_eq!(runner.codec_names(), vec!["json", "bincode"]);
    }

    #[test]
    fn test_measure_reports_completed_trials() {
        let runner = BenchmarkRunner::<SalesItemContainer>::new(RunnerOptions {
            iterations: 5,
            warmup_iterations: 0,
        });
        let mut calls = 0;
        let outcome = runner.measure(|| {
            calls += 1;
            if calls > 2 {
                Err(CodecError::decode("test", "boom"))
            } else {
                Ok(calls)
            }
        });
        match outcome {
            Err((completed, error)) => {
                assert_eq!(completed, 2);
                assert!(error.is_decode());
            }
            Ok(_) => panic!("expected a failure"),
        }
    }
}
