mod experiment;
mod run;

pub use experiment::{
    output_dir,
    prepare_output_dir,
    run_experiment_off_policy,
};
pub use run::{
    loop_off_policy,
    TrainingOutcome,
};
