use pkgorder::job::Job;
use pkgorder::resolved::DecisionEntry;

fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",       "Show help");
		opts.optflag( "v", "verbose",    "Show job requirements and cycle notes");
		opts.optflag( "",  "json",       "Print the job lists as JSON");
		opts.optopt(  "c", "config",     "Config file to use instead of the default", "PATH");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: pkgorder-terminal [options] (order|graph) RESOLUTIONS.json"));
			return;
		}

		parsed_options
	};

	let config = match parsed_options.opt_str("c") {
		Some(path) => pkgorder::OrdererConfig::load_from_path(path),
		None => pkgorder::OrdererConfig::load_from_disk(),
	}.unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		pkgorder::OrdererConfig::default()
	});

	let (command, path) = match (parsed_options.free.first(), parsed_options.free.get(1)) {
		(Some(command), Some(path)) => (command.as_str(), path),
		_ => {
			log::error!("{}", Error::MissingArgument);
			eprintln!("{}", opts.usage("Usage: pkgorder-terminal [options] (order|graph) RESOLUTIONS.json"));
			return;
		},
	};

	let resolved = match order(&config, path) {
		Ok(r) => r,
		Err(e) => { log::error!("Failed to order resolutions: {}", e); return },
	};

	let result = match command {
		"order" => if parsed_options.opt_present("json") {
			print_json(&resolved)
		} else {
			display_resolution(&resolved, parsed_options.opt_present("v"));
			Ok(())
		},
		"graph" => {
			graph_jobs(&resolved);
			Ok(())
		},
		other => Err(Error::UnknownCommand(other.to_owned())),
	};

	if let Err(e) = result {
		log::error!("{}", e);
	}
}

fn order(config: &pkgorder::OrdererConfig, path: impl AsRef<std::path::Path>) -> Result<pkgorder::Resolved, Error> {
	let file = std::fs::File::open(path).map_err(pkgorder::Error::from)?;
	let resolutions: pkgorder::resolution::Resolutions = serde_json::from_reader(std::io::BufReader::new(file))
		.map_err(pkgorder::Error::from)?;
	log::info!("Loaded {} resolutions", resolutions.len());

	let matcher = config.matcher()?;
	let resolved = pkgorder::OrdererBuilder::new(resolutions)
		.order_early(|r| matcher.order_early(r))
		.notifier(|event| log::trace!("{:?}", event))
		.build()
		.resolve()?;
	Ok(resolved)
}

fn print_json(resolved: &pkgorder::Resolved) -> Result<(), Error> {
	let json = serde_json::to_string_pretty(resolved.job_lists()).map_err(pkgorder::Error::from)?;
	println!("{}", json);
	Ok(())
}

fn print_entries(title: &str, entries: &[DecisionEntry], verbose: bool) {
	if entries.is_empty() {
		return;
	}
	println!("{}:", title);
	for entry in entries {
		println!("\t{}", entry.resolvent);
		if let Some(notes) = entry.notes.as_ref().filter(|n| verbose && !n.cycle_breaking.is_empty()) {
			println!("\t\t{}", notes.cycle_breaking);
		}
	}
}

fn display_resolution(resolved: &pkgorder::Resolved, verbose: bool) {
	print_entries("These are the actions I will take, in order", resolved.taken_change_or_remove_decisions(), verbose);
	print_entries("I cannot order these", resolved.taken_unorderable_decisions(), true);
	print_entries("I was unable to make decisions for these", resolved.taken_unable_to_make_decisions(), verbose);
	print_entries("These need to be confirmed", resolved.taken_unconfirmed_decisions(), verbose);
	print_entries("I did not take these decisions", resolved.untaken_change_or_remove_decisions(), verbose);
	print_entries("I did not take these unable to make decisions", resolved.untaken_unable_to_make_decisions(), verbose);

	println!("Jobs:");
	for (number, job) in resolved.job_lists().execute_job_list().iter().enumerate() {
		println!("\t{}) {}", number, job);
		if verbose {
			for requirement in job.requirements() {
				println!("\t\trequires {}", requirement);
			}
		}
	}
}

/// Prints the execute list as a graphviz digraph of job requirements.
fn graph_jobs(resolved: &pkgorder::Resolved) {
	let jobs = resolved.job_lists().execute_job_list();
	println!("digraph jobs {{");
	for (number, job) in jobs.iter().enumerate() {
		let shape = match job {
			Job::Fetch(_) => "ellipse",
			Job::Install(_) => "box",
			Job::Uninstall(_) => "diamond",
			Job::Pretend(_) => "plaintext",
		};
		println!("\t{} [label=\"{}\", shape={}];", number, job.string_id(), shape);
		for requirement in job.requirements() {
			println!("\t{} -> {} [label=\"{}\"];", number, requirement.job_number, requirement);
		}
	}
	println!("}}");
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("pkgorder error: {0}")]
	Pkgorder(#[from] pkgorder::Error),
	#[error("Missing argument")]
	MissingArgument,
	#[error("Unknown command {0}")]
	UnknownCommand(String),
}
