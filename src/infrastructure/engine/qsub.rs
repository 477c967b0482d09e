//! PBS submission script rendering
//!
//! Produces the `run.qsub` file submitted for `environment: qsub` runs. The
//! main commands run in `$TMPDIR`; inputs are copied there first and selected
//! outputs are copied back to the working directory afterwards.

use std::path::Path;

use crate::domain::run::{QsubSpec, RunSpec};

/// PBS rejects job names longer than this
const MAX_JOBNAME: usize = 14;

/// Render the full submission script for one run.
///
/// `workdir` is the absolute output directory on the execution host;
/// `input_names` are the staged files copied into `$TMPDIR`; the command
/// lists have already had their variable tags substituted.
pub fn render(
    run: &RunSpec,
    qsub: &QsubSpec,
    workdir: &Path,
    input_names: &[String],
    before_run: &[String],
    commands: &[String],
    after_run: &[String],
) -> String {
    let jobname: String = qsub
        .jobname
        .clone()
        .unwrap_or_else(|| run.directory_name())
        .chars()
        .take(MAX_JOBNAME)
        .collect();

    let ncores = qsub.cores_per_node;
    let nprocs = qsub.nnodes * ncores;

    let mut pbs_optional = String::new();
    if let Some(queue) = &qsub.queue {
        pbs_optional.push_str(&format!("#PBS -q {}\n", queue));
    }
    if let Some(email) = &qsub.email {
        // Mail on begin/end/abort.
        pbs_optional.push_str(&format!("#PBS -M {}\n", email));
        pbs_optional.push_str("#PBS -m bae\n");
    }

    let load_modules = if qsub.modules.is_empty() {
        String::new()
    } else {
        format!("module load {}", qsub.modules.join(" "))
    };

    let copy_to_temp: String = input_names
        .iter()
        .map(|name| format!("cp -p {} $TMPDIR\n", workdir.join(name).display()))
        .collect();

    let copy_from_temp: String = qsub
        .from_temp
        .iter()
        .map(|pattern| {
            let pattern = if pattern.starts_with('*') {
                pattern.clone()
            } else {
                format!("*{}", pattern)
            };
            format!("cp -pR $TMPDIR/{} {}\n", pattern, workdir.display())
        })
        .collect();

    format!(
        r#"#!/bin/bash --login
#PBS -N {jobname}
#PBS -l walltime={walltime}
#PBS -l select={nnodes}:ncpus={ncores}
#PBS -j oe
{pbs_optional}
echo "<qstat -f $PBS_JOBID>"
qstat -f $PBS_JOBID
echo "</qstat -f $PBS_JOBID>"

# number of cores per node used
export NCORES={ncores}
# number of processes
export NPROCESSES={nprocs}

# Make sure any symbolic links are resolved to absolute path
export PBS_O_WORKDIR=$(readlink -f $PBS_O_WORKDIR)

# Set the number of threads to 1
#   This prevents any system libraries from automatically
#   using threading.
export OMP_NUM_THREADS=1

{load_modules}

# commands to run before main run (in $WORKDIR)
{before_run}

# copy required input files from $WORKDIR to $TMPDIR
{copy_to_temp}
# main commands to run (in $TMPDIR)
{exec_run}

# copy required output files from $TMPDIR to $WORKDIR
{copy_from_temp}
# commands to run after main run (in $WORKDIR)
{after_run}
"#,
        jobname = jobname,
        walltime = qsub.walltime,
        nnodes = qsub.nnodes,
        ncores = ncores,
        nprocs = nprocs,
        pbs_optional = pbs_optional,
        load_modules = load_modules,
        before_run = before_run.join("\n"),
        copy_to_temp = copy_to_temp,
        exec_run = commands.join("\n"),
        copy_from_temp = copy_from_temp,
        after_run = after_run.join("\n"),
    )
}
