use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

/// Package version plus the git commit and target the binary was built from.
pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	" (",
	env!("VERGEN_GIT_SHA"),
	", ",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
	")",
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD | Effects::UNDERLINE)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Green.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}
