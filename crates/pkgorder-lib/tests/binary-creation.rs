use pretty_assertions::assert_eq;

use pkgorder::nag::NagIndex;
use pkgorder::package::PackageId;
use pkgorder::resolution::*;
use pkgorder::job::Job;
use pkgorder::OrdererBuilder;
use pkgorder_test_utils::*;

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn install_waits_for_binary() {
	init();
	let resolutions = ResolutionsBuilder::new()
		.install_to(binary("cat/x"), true)
		.install("cat/x")
		.target("cat/x")
		.build()
		.unwrap();
	let resolved = OrdererBuilder::new(resolutions).build().resolve().unwrap();

	let edges = resolved.nag().edges_from(&NagIndex::fetched(slash("cat/x")));
	let (to, properties) = edges.iter()
		.find(|(to, _)| to == &NagIndex::done(binary("cat/x")))
		.expect("no edge to the binary");
	assert_eq!(to.resolvent, binary("cat/x"));
	assert!(properties.always);

	let decision = resolved.decision(&slash("cat/x")).and_then(Decision::as_changes_to_make).unwrap();
	assert_eq!(decision.via_new_binary_in.as_deref(), Some("binaries"));

	let execute = resolved.job_lists().execute_job_list();
	assert_eq!(job_ids(execute), [
		"f:cat/x -> create_binary",
		"i:cat/x -> create_binary",
		"f:cat/x -> install_to_slash",
		"i:cat/x -> install_to_slash",
	]);
	assert_eq!(stringify_requirements(execute.fetch(2).unwrap()), [
		"1 satisfied fetching",
		"1 always fetching",
		"1 independent fetching",
	]);
	assert_eq!(stringify_requirements(execute.fetch(3).unwrap()), [
		"2 satisfied independent always fetching",
		"1 independent",
	]);

	let Some(Job::Install(install)) = execute.fetch(3) else {
		panic!("expected an install job");
	};
	assert_eq!(install.origin_id, PackageId::new("cat/x", "1.0", "binaries"));
	assert_eq!(install.destination_repository, "installed");
}

#[test]
fn untaken_install_is_not_redirected() {
	init();
	let resolutions = ResolutionsBuilder::new()
		.install_to(binary("cat/x"), true)
		.untaken_install("cat/x")
		.build()
		.unwrap();
	let resolved = OrdererBuilder::new(resolutions).build().resolve().unwrap();

	let decision = resolved.decision(&slash("cat/x")).and_then(Decision::as_changes_to_make).unwrap();
	assert_eq!(decision.via_new_binary_in, None);
	assert_eq!(entry_names(resolved.untaken_change_or_remove_decisions()), ["cat/x"]);
}

#[test]
fn build_dependency_routes_through_binary() {
	init();
	let resolutions = ResolutionsBuilder::new()
		.install_to(binary("cat/x"), true)
		.install("cat/x")
		.install("cat/y")
		.build_depends("cat/x", "cat/y")
		.build()
		.unwrap();
	let resolved = OrdererBuilder::new(resolutions).build().resolve().unwrap();

	let nag = resolved.nag();
	let y = NagIndex::done(slash("cat/y"));
	assert!(nag.edges_from(&NagIndex::done(binary("cat/x"))).iter().any(|(to, _)| to == &y));
	assert!(!nag.edges_from(&NagIndex::done(slash("cat/x"))).iter().any(|(to, _)| to == &y));

	let execute = resolved.job_lists().execute_job_list();
	let install_y = job_number(execute, "i", &slash("cat/y")).unwrap();
	let build_x = job_number(execute, "i", &binary("cat/x")).unwrap();
	assert!(install_y < build_x);
}

#[test]
fn inconsistent_origin_is_an_error() {
	init();
	let other_version = Decision::ChangesToMake(ChangesToMakeDecision {
		taken: true,
		origin_id: PackageId::new("cat/x", "2.0", "repo"),
		change_type: ChangeType::NewPackage,
		destination: Destination { repository: "binaries".to_owned(), replacing: vec![] },
		required_confirmations: vec![],
		via_new_binary_in: None,
	});
	let resolutions = ResolutionsBuilder::new()
		.decision(binary("cat/x"), other_version)
		.install("cat/x")
		.build()
		.unwrap();

	let result = OrdererBuilder::new(resolutions).build().resolve();
	assert!(matches!(result, Err(pkgorder::Error::InconsistentOrigin(r)) if r == slash("cat/x")));
}

#[test]
fn existing_binary_does_not_take_build_dependencies() {
	init();
	let existing_binary = Decision::ExistingNoChange(ExistingNoChangeDecision {
		taken: true,
		existing_id: PackageId::new("cat/x", "1.0", "binaries"),
		is_same: true,
	});
	let resolutions = ResolutionsBuilder::new()
		.install("cat/x")
		.install("cat/y")
		.decision(binary("cat/x"), existing_binary)
		.build_depends("cat/x", "cat/y")
		.build()
		.unwrap();
	let resolved = OrdererBuilder::new(resolutions).build().resolve().unwrap();

	let nag = resolved.nag();
	let y = NagIndex::done(slash("cat/y"));
	assert!(nag.edges_from(&NagIndex::done(slash("cat/x"))).iter().any(|(to, _)| to == &y));
	assert!(nag.edges_from(&NagIndex::done(binary("cat/x"))).is_empty());

	let decision = resolved.decision(&slash("cat/x")).and_then(Decision::as_changes_to_make).unwrap();
	assert_eq!(decision.via_new_binary_in, None);

	let execute = resolved.job_lists().execute_job_list();
	assert_eq!(job_ids(execute), [
		"f:cat/x -> install_to_slash",
		"f:cat/y -> install_to_slash",
		"i:cat/y -> install_to_slash",
		"i:cat/x -> install_to_slash",
	]);
	assert_eq!(stringify_requirements(execute.fetch(3).unwrap()), [
		"0 satisfied independent always fetching",
		"2 satisfied",
		"2 independent",
	]);
}
