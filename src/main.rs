use drr_scheduler::*;
use log::*;
use structopt::*;

#[derive(StructOpt, Debug)]
#[structopt(name = "drr-scheduler", about = "Double round-robin schedules with few away breaks")]
struct Opt {
    /// Number of teams (even)
    #[structopt(short = "n", long, default_value = "10")]
    teams: usize,

    /// none, mirrored, french, english, inverted, back-to-back or min-max
    #[structopt(short, long, default_value = "mirrored")]
    scheme: SchemeKind,

    /// Top team index, repeat for several
    #[structopt(short = "t", long = "top-team")]
    top_teams: Vec<usize>,

    /// Min-max: meetings of a pair are more than c rounds apart
    #[structopt(short = "c")]
    c: Option<usize>,

    /// Min-max: an away meeting has the home meeting within d rounds
    #[structopt(short = "d")]
    d: Option<usize>,

    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(long)]
    quiet: bool,

    /// Team names, one per line, used when printing
    #[structopt(long, parse(from_os_str))]
    names: Option<std::path::PathBuf>,

    /// Write the model in LP format
    #[structopt(long, parse(from_os_str))]
    write_problem: Option<std::path::PathBuf>,

    /// Write the solved assignment
    #[structopt(long, parse(from_os_str))]
    write_solution: Option<std::path::PathBuf>,

    /// Decode and print an existing solution file instead of solving
    #[structopt(long, parse(from_os_str))]
    from_solution: Option<std::path::PathBuf>,

    /// Stop after presolve
    #[structopt(long)]
    presolve_only: bool,

    /// Give up on proving optimality after this many seconds
    #[structopt(long)]
    time_limit: Option<u64>,
}

fn main() {
    let options = Opt::from_args();

    if let Err(e) = stderrlog::StdErrLog::new()
        .verbosity(options.verbose as usize + 1)
        .quiet(options.quiet)
        .module(module_path!())
        .show_module_names(true)
        .color(stderrlog::ColorChoice::Auto)
        .init()
    {
        eprintln!("could not set up logging: {}", e);
    }

    info!("Arguments {:#?}", options);

    if let Err(e) = run(&options) {
        error!("{}", e);
        eprintln!("error: {}", e);
        let code = match e {
            ScheduleError::InfeasibleModel { .. } => 2,
            ScheduleError::NotOptimal { .. } => 3,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn run(options: &Opt) -> Result<()> {
    let names = match options.names.as_ref() {
        Some(path) => Some(TeamNames::read(path)?),
        None => None,
    };

    if let Some(path) = options.from_solution.as_ref() {
        info!("Loading solution {:?}", path);
        let solution = read_solution(path)?;
        let table = FixtureTable::decode(options.teams, &solution)?;
        table.ensure_complete()?;
        if !verify_schedule(&table, false) {
            warn!("Solution is not a valid double round robin.");
        }
        println!("{}", format_schedule(&table, names.as_ref()));
        return Ok(());
    }

    let scheme = Scheme::from_parts(options.scheme, options.c, options.d)?;
    let config = ScheduleConfig {
        teams: options.teams,
        scheme,
        top_teams: options.top_teams.clone(),
        verbose: options.verbose > 0,
    };

    let mut engine = CadicalEngine::cadical();
    if let Some(secs) = options.time_limit {
        engine = engine.with_time_limit(std::time::Duration::from_secs(secs));
    }
    let mut model = ScheduleModel::new(&config, engine)?;
    info!(
        "{} over {} rounds: {} SAT variables, {} rows",
        model.config().scheme,
        model.config().rounds,
        model.engine().num_variables(),
        model.engine().num_constraints()
    );

    if let Some(path) = options.write_problem.as_ref() {
        model.write_problem(path)?;
    }

    model.presolve()?;
    if options.presolve_only {
        println!("presolve: {}", model.status());
        return Ok(());
    }

    model.optimize()?;
    let table = model.fixture_table()?;
    if scheme.uses_legs() && !verify_schedule(&table, true) {
        warn!("Schedule failed verification.");
    }

    if !options.quiet {
        println!("{}", format_schedule(&table, names.as_ref()));
    }
    println!(
        "away breaks: {} (solved in {:.2}s)",
        model.objective_value()?,
        model.solving_time()?.as_secs_f64()
    );

    if let Some(path) = options.write_solution.as_ref() {
        model.write_solution(path)?;
    }

    Ok(())
}
