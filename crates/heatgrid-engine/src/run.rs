//! Whole-run orchestration: one thread per participant.
//!
//! [`run`] plays the role of the process launcher. It validates the
//! configuration, builds an in-process world of `participants` endpoints,
//! runs every participant on its own named thread and collects the
//! coordinator's result. [`run_world`] does the same over any set of
//! endpoints implementing [`Communicator`].

use std::thread;
use std::time::Duration;

use heatgrid_comm::{local_world, AbortOnDrop, Communicator};
use heatgrid_core::{CommError, Decomposition, GlobalGrid, Rank, SolveError};

use crate::config::SolverConfig;
use crate::controller::Participant;
use crate::gather::{gather_field, GlobalField};
use crate::metrics::RunReport;

/// What the coordinator hands back from its thread.
struct CoordinatorOutput {
    field: GlobalField,
    elapsed: Duration,
    completed: usize,
}

/// Run `config` to completion on an in-process world.
pub fn run(config: &SolverConfig) -> Result<RunReport, SolveError> {
    config.validate()?;
    run_world(local_world(config.participants), config)
}

/// Run `config` over `world`, one thread per endpoint.
///
/// Endpoint `i` must have rank `i` and the world must have
/// `config.participants` endpoints. If any participant fails, every other
/// participant is aborted and the first failure that is not merely an
/// abort echo is returned.
pub fn run_world<C>(world: Vec<C>, config: &SolverConfig) -> Result<RunReport, SolveError>
where
    C: Communicator + Send,
{
    let grid = config.validate()?;
    if world.len() != config.participants {
        return Err(CommError::WorldSizeMismatch {
            expected: config.participants,
            actual: world.len(),
        }
        .into());
    }
    let decomposition = Decomposition::new(config.grid_x, config.participants)?;
    let threads = config.resolved_threads();

    tracing::info!(
        grid_x = config.grid_x,
        grid_y = config.grid_y,
        iterations = config.iterations,
        participants = config.participants,
        threads,
        dt = grid.dt(),
        "starting run"
    );

    let results: Vec<Result<Option<CoordinatorOutput>, SolveError>> = thread::scope(|s| {
        let mut handles = Vec::with_capacity(world.len());
        let mut spawn_failure = None;
        for (r, comm) in world.into_iter().enumerate() {
            let rank = Rank(r);
            let mut seat = AbortOnDrop::new(comm);
            let (grid, decomposition) = (&grid, &decomposition);
            let spawned = thread::Builder::new()
                .name(format!("heatgrid-rank-{r}"))
                .spawn_scoped(s, move || {
                    let span = tracing::info_span!("participant", rank = r);
                    let _enter = span.enter();
                    let result = participate(&*seat, config, grid, decomposition);
                    match &result {
                        Ok(_) => seat.disarm(),
                        Err(e) => tracing::error!(error = %e, "participant failed"),
                    }
                    result
                });
            match spawned {
                Ok(handle) => handles.push((rank, handle)),
                Err(e) => {
                    spawn_failure = Some(SolveError::ThreadSpawnFailed {
                        rank,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        let mut results: Vec<_> = handles
            .into_iter()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(SolveError::ParticipantPanicked { rank }))
            })
            .collect();
        results.extend(spawn_failure.map(Err));
        results
    });

    let output = first_failure(results)?.ok_or(SolveError::MissingResult)?;
    let report = RunReport {
        participants: config.participants,
        threads,
        grid_x: config.grid_x,
        grid_y: config.grid_y,
        iterations_requested: config.iterations,
        iterations_completed: output.completed,
        elapsed: output.elapsed,
        field: output.field,
    };
    tracing::info!(
        completed = report.iterations_completed,
        elapsed_s = report.elapsed.as_secs_f64(),
        gflops_per_s = report.gflops_per_second(),
        "run finished"
    );
    Ok(report)
}

/// Body of one participant's thread.
fn participate<C: Communicator + ?Sized>(
    comm: &C,
    config: &SolverConfig,
    grid: &GlobalGrid,
    decomposition: &Decomposition,
) -> Result<Option<CoordinatorOutput>, SolveError> {
    let mut participant = Participant::new(comm, config, grid)?;

    comm.barrier()?;
    let start = comm.wtime();
    let completed = participant.run(config.iterations)?;
    let elapsed = comm.wtime() - start;

    let field = gather_field(comm, decomposition, grid.height(), &participant.local_interior())?;
    Ok(field.map(|field| CoordinatorOutput {
        field,
        elapsed: Duration::try_from_secs_f64(elapsed).unwrap_or_default(),
        completed,
    }))
}

/// The coordinator's output, or the most informative failure.
///
/// Aborts are echoes of some other participant's failure, so a non-echo
/// error wins over them.
fn first_failure(
    results: Vec<Result<Option<CoordinatorOutput>, SolveError>>,
) -> Result<Option<CoordinatorOutput>, SolveError> {
    let mut echo = None;
    let mut coordinator = None;
    for (r, result) in results.into_iter().enumerate() {
        match result {
            Ok(out) if r == Rank::ROOT.index() => coordinator = out,
            Ok(_) => {}
            Err(e) if e.is_abort_echo() => {
                echo.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    match echo {
        Some(e) => Err(e),
        None => Ok(coordinator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatgrid_core::ConfigError;

    #[test]
    fn root_output_is_kept() {
        let out = CoordinatorOutput {
            field: GlobalField::from_row_major(1, 1, vec![2.0]),
            elapsed: Duration::ZERO,
            completed: 3,
        };
        let picked = first_failure(vec![Ok(Some(out)), Ok(None)]).unwrap().unwrap();
        assert_eq!(picked.completed, 3);
    }

    #[test]
    fn real_failure_beats_abort_echo() {
        let results = vec![
            Err(SolveError::Comm(CommError::Aborted { origin: Rank(2) })),
            Ok(None),
            Err(SolveError::ParticipantPanicked { rank: Rank(2) }),
        ];
        assert!(matches!(
            first_failure(results),
            Err(SolveError::ParticipantPanicked { rank: Rank(2) })
        ));
    }

    #[test]
    fn lone_echo_is_reported() {
        let results = vec![Err(SolveError::Comm(CommError::Aborted { origin: Rank(1) }))];
        assert!(matches!(
            first_failure(results),
            Err(SolveError::Comm(CommError::Aborted { .. }))
        ));
    }

    #[test]
    fn missing_root_output_is_none() {
        assert!(first_failure(vec![Ok(None)]).unwrap().is_none());
    }

    #[test]
    fn oversized_grid_fails_before_any_thread_starts() {
        let config = SolverConfig {
            threads: Some(1),
            ..SolverConfig::new(usize::MAX, 1, 1)
        };
        assert!(matches!(
            run(&config),
            Err(SolveError::Config(ConfigError::CellCountOverflow { .. }))
        ));
    }

    #[test]
    fn world_size_mismatch_rejected() {
        let config = SolverConfig {
            participants: 2,
            ..SolverConfig::new(4, 4, 1)
        };
        assert!(matches!(
            run_world(local_world(3), &config),
            Err(SolveError::Comm(CommError::WorldSizeMismatch {
                expected: 2,
                actual: 3
            }))
        ));
    }
}
