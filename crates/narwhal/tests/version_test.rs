#[test]
fn version_matches_the_package() {
    assert_eq!(narwhal::VERSION, env!("CARGO_PKG_VERSION"));
}
