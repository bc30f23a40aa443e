/// Knobs for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
	/// Path generated code uses to reach the runtime crate.
	pub runtime_crate: String,
	/// Embed the contract's binary ABI as a hex constant.
	pub embed_abi: bool,
}

impl Default for GenerateConfig {
	fn default() -> Self {
		Self {
			runtime_crate: "abigen_runtime".to_string(),
			embed_abi: true,
		}
	}
}

impl GenerateConfig {
	#[must_use]
	pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
		self.runtime_crate = path.into();
		self
	}

	#[must_use]
	pub fn embed_abi(mut self, embed: bool) -> Self {
		self.embed_abi = embed;
		self
	}
}
