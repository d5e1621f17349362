use pretty_assertions::assert_eq;

use pkgorder::resolution::DependencyLabel;
use pkgorder::{OrdererBuilder, Resolved};
use pkgorder_test_utils::*;

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn resolve(builder: ResolutionsBuilder) -> Resolved {
	init();
	let resolutions = builder.build().expect("failed to build resolutions");
	OrdererBuilder::new(resolutions).build().resolve().expect("failed to order")
}

#[test]
fn build_dependency_is_installed_first() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.target("cat/x")
		.install("cat/y")
		.build_depends("cat/x", "cat/y")
	);

	let execute = resolved.job_lists().execute_job_list();
	assert_eq!(job_ids(execute), [
		"f:cat/x -> install_to_slash",
		"f:cat/y -> install_to_slash",
		"i:cat/y -> install_to_slash",
		"i:cat/x -> install_to_slash",
	]);

	let install_x = execute.fetch(3).unwrap();
	assert_eq!(stringify_requirements(install_x), [
		"0 satisfied independent always fetching",
		"2 satisfied",
		"2 independent",
	]);
	assert_eq!(stringify_requirements(execute.fetch(2).unwrap()), ["1 satisfied independent always fetching"]);
	assert!(execute.fetch(0).unwrap().requirements().is_empty());

	assert_eq!(entry_names(resolved.taken_change_or_remove_decisions()), ["cat/y", "cat/x"]);
	assert_eq!(job_ids(resolved.job_lists().pretend_job_list()), [
		"p:cat/y -> install_to_slash",
		"p:cat/x -> install_to_slash",
	]);
	assert!(resolved.taken_unorderable_decisions().is_empty());
}

#[test]
fn mutual_build_dependencies_are_unorderable() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.install("cat/y")
		.build_depends("cat/x", "cat/y")
		.build_depends("cat/y", "cat/x")
	);

	assert_eq!(entry_names(resolved.taken_unorderable_decisions()), ["cat/x", "cat/y"]);
	for name in ["cat/x", "cat/y"] {
		assert_eq!(
			entry_notes(resolved.taken_unorderable_decisions(), name).unwrap(),
			"In unsolvable dependency cycle with: cat/x, cat/y",
		);
	}

	assert!(resolved.taken_change_or_remove_decisions().is_empty());
	assert_eq!(job_ids(resolved.job_lists().execute_job_list()), [
		"f:cat/x -> install_to_slash",
		"f:cat/y -> install_to_slash",
	]);
	assert!(resolved.job_lists().pretend_job_list().is_empty());
}

#[test]
fn mutual_run_dependencies_are_ordered() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.install("cat/y")
		.run_depends("cat/x", "cat/y")
		.run_depends("cat/y", "cat/x")
	);

	assert!(resolved.taken_unorderable_decisions().is_empty());
	let taken = resolved.taken_change_or_remove_decisions();
	assert_eq!(entry_names(taken), ["cat/x", "cat/y"]);
	for name in ["cat/x", "cat/y"] {
		assert_eq!(
			entry_notes(taken, name).unwrap(),
			"In run dependency cycle with: cat/x, cat/y in dependency cycle with cat/x, cat/y",
		);
	}

	let execute = resolved.job_lists().execute_job_list();
	assert_eq!(job_ids(execute), [
		"f:cat/x -> install_to_slash",
		"f:cat/y -> install_to_slash",
		"i:cat/x -> install_to_slash",
		"i:cat/y -> install_to_slash",
	]);
	/* whichever goes second waits for the first */
	assert_eq!(stringify_requirements(execute.fetch(3).unwrap()), [
		"1 satisfied independent always fetching",
		"2 satisfied",
		"2 independent",
	]);
	assert_eq!(stringify_requirements(execute.fetch(2).unwrap()), ["0 satisfied independent always fetching"]);
}

#[test]
fn unmet_self_build_dependency_is_unorderable() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.build_depends("cat/x", "cat/x")
	);

	assert_eq!(entry_names(resolved.taken_unorderable_decisions()), ["cat/x"]);
	assert_eq!(entry_notes(resolved.taken_unorderable_decisions(), "cat/x").unwrap(), "Self dependent (unsolvable)");
	assert!(resolved.taken_change_or_remove_decisions().is_empty());
	assert_eq!(job_ids(resolved.job_lists().execute_job_list()), ["f:cat/x -> install_to_slash"]);
}

#[test]
fn runtime_self_dependency_is_scheduled() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.run_depends("cat/x", "cat/x")
	);

	assert!(resolved.taken_unorderable_decisions().is_empty());
	assert_eq!(entry_notes(resolved.taken_change_or_remove_decisions(), "cat/x").unwrap(), "Self dependent (runtime only)");
	assert_eq!(job_ids(resolved.job_lists().execute_job_list()), [
		"f:cat/x -> install_to_slash",
		"i:cat/x -> install_to_slash",
	]);
}

#[test]
fn met_self_dependency_is_scheduled() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.depends(slash("cat/x"), slash("cat/x"), &[DependencyLabel::Build], true)
	);

	assert!(resolved.taken_unorderable_decisions().is_empty());
	assert_eq!(entry_notes(resolved.taken_change_or_remove_decisions(), "cat/x").unwrap(), "Self dependent (already met)");
}

#[test]
fn cycle_broken_by_met_dependency() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.install("cat/y")
		/* x's need for y is already satisfied by what is installed */
		.depends(slash("cat/x"), slash("cat/y"), &[DependencyLabel::Build], true)
		.build_depends("cat/y", "cat/x")
	);

	assert!(resolved.taken_unorderable_decisions().is_empty());
	let taken = resolved.taken_change_or_remove_decisions();
	assert_eq!(entry_names(taken), ["cat/x", "cat/y"]);
	assert_eq!(entry_notes(taken, "cat/x").unwrap(), "In dependency cycle with: cat/x, cat/y");
	assert_eq!(entry_notes(taken, "cat/y").unwrap(), "In dependency cycle with: cat/x, cat/y");

	let execute = resolved.job_lists().execute_job_list();
	let install_x = job_number(execute, "i", &slash("cat/x")).unwrap();
	let install_y = job_number(execute, "i", &slash("cat/y")).unwrap();
	assert!(install_x < install_y);
	assert!(execute.fetch(install_y).unwrap().requirements().iter()
		.any(|r| r.job_number == install_x && r.has(pkgorder::job::JobRequirementIf::RequireForSatisfied)));
}

#[test]
fn cycle_among_existing_packages_is_ignored() {
	let resolved = resolve(ResolutionsBuilder::new()
		.existing("cat/a")
		.existing("cat/b")
		.run_depends("cat/a", "cat/b")
		.run_depends("cat/b", "cat/a")
		.install("cat/x")
		.build_depends("cat/x", "cat/a")
	);

	assert!(resolved.taken_unorderable_decisions().is_empty());
	assert_eq!(entry_names(resolved.taken_change_or_remove_decisions()), ["cat/x"]);
	let install = resolved.job_lists().execute_job_list().fetch(1).unwrap();
	assert_eq!(stringify_requirements(install), ["0 satisfied independent always fetching"]);
}

#[test]
fn identical_input_gives_identical_output() {
	let builder = || ResolutionsBuilder::new()
		.install("cat/a")
		.install("cat/b")
		.install("cat/c")
		.install("cat/d")
		.run_depends("cat/a", "cat/b")
		.run_depends("cat/b", "cat/a")
		.build_depends("cat/c", "cat/a")
		.build_depends("cat/d", "cat/c")
		.build_depends("cat/c", "cat/d");

	let first = resolve(builder());
	let second = resolve(builder());
	assert_eq!(first.job_lists(), second.job_lists());
	assert_eq!(first.taken_change_or_remove_decisions(), second.taken_change_or_remove_decisions());
	assert_eq!(first.taken_unorderable_decisions(), second.taken_unorderable_decisions());
}

#[test]
fn cycle_through_existing_package() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.install("cat/y")
		.existing("cat/e")
		.run_depends("cat/x", "cat/e")
		.run_depends("cat/e", "cat/y")
		.run_depends("cat/y", "cat/x")
	);

	assert!(resolved.taken_unorderable_decisions().is_empty());
	let taken = resolved.taken_change_or_remove_decisions();
	assert_eq!(entry_names(taken), ["cat/x", "cat/y"]);
	for name in ["cat/x", "cat/y"] {
		assert_eq!(entry_notes(taken, name).unwrap(), "In dependency cycle with existing packages: cat/x, cat/y");
	}
}

#[test]
fn pruned_cycle_is_not_pruned_again() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.install("cat/y")
		/* the met build need goes away when pruning, the run cycle stays */
		.depends(slash("cat/x"), slash("cat/y"), &[DependencyLabel::Build], true)
		.run_depends("cat/x", "cat/y")
		.run_depends("cat/y", "cat/x")
	);

	assert!(resolved.taken_unorderable_decisions().is_empty());
	let taken = resolved.taken_change_or_remove_decisions();
	assert_eq!(entry_names(taken), ["cat/x", "cat/y"]);
	for name in ["cat/x", "cat/y"] {
		assert_eq!(entry_notes(taken, name).unwrap(), "In run dependency cycle with: cat/x, cat/y");
	}

	let execute = resolved.job_lists().execute_job_list();
	assert!(job_number(execute, "i", &slash("cat/x")).is_some());
	assert!(job_number(execute, "i", &slash("cat/y")).is_some());
}

#[test]
fn unsolvable_cycle_through_fetch_lists_each_package_once() {
	let resolved = resolve(ResolutionsBuilder::new()
		.install("cat/x")
		.install("cat/y")
		.depends(slash("cat/x"), slash("cat/y"), &[DependencyLabel::Fetch], false)
		.build_depends("cat/y", "cat/x")
	);

	let unorderable = resolved.taken_unorderable_decisions();
	assert_eq!(entry_names(unorderable), ["cat/x", "cat/y"]);
	assert_eq!(entry_notes(unorderable, "cat/x").unwrap(), "In unsolvable dependency cycle with: cat/x, cat/y");

	assert!(resolved.taken_change_or_remove_decisions().is_empty());
	assert_eq!(job_ids(resolved.job_lists().execute_job_list()), ["f:cat/y -> install_to_slash"]);
}
