/// Build version reported on the status page and in logs.
pub fn version() -> &'static str {
	env!("CARGO_PKG_VERSION")
}
