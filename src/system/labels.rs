//! Canonical OS and architecture labels and their known aliases.

pub const OS_LINUX: &str = "linux";
pub const OS_WINDOWS: &str = "windows";
pub const OS_DARWIN: &str = "darwin";
pub const OS_FREEBSD: &str = "freebsd";
pub const OS_NETBSD: &str = "netbsd";
pub const OS_ILLUMOS: &str = "illumos";
pub const OS_SOLARIS: &str = "solaris";
pub const OS_OPENBSD: &str = "openbsd";

pub const ARCH_X86_64: &str = "x86_64";
pub const ARCH_386: &str = "386";
pub const ARCH_ARM: &str = "arm";
pub const ARCH_ARM64: &str = "arm64";
pub const ARCH_RISCV64: &str = "riscv64";
pub const ARCH_S390X: &str = "s390x";
pub const ARCH_PPC64LE: &str = "ppc64le";

/// One canonical label together with every spelling that maps to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLabel {
    pub name: String,
    pub aliases: Vec<String>,
}

impl CanonicalLabel {
    pub fn new(name: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Aliases ordered longest first, then lexicographically.
    pub fn sorted_aliases(&self) -> Vec<&str> {
        let mut list: Vec<&str> = self.aliases.iter().map(String::as_str).collect();
        sort_longest_first(&mut list);
        list
    }

    pub fn matches(&self, label: &str) -> bool {
        self.aliases.iter().any(|a| a.eq_ignore_ascii_case(label))
    }
}

/// Sort terms so longer strings come first. Regex alternations built from
/// the result try `arm64` before `arm`.
pub fn sort_longest_first(list: &mut [&str]) {
    list.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
}

pub fn builtin_os_labels() -> Vec<CanonicalLabel> {
    vec![
        CanonicalLabel::new(OS_LINUX, &[OS_LINUX]),
        CanonicalLabel::new(OS_WINDOWS, &[OS_WINDOWS]),
        CanonicalLabel::new(OS_DARWIN, &[OS_DARWIN, "macos", "osx"]),
        CanonicalLabel::new(OS_FREEBSD, &[OS_FREEBSD]),
        CanonicalLabel::new(OS_NETBSD, &[OS_NETBSD]),
        CanonicalLabel::new(OS_ILLUMOS, &[OS_ILLUMOS]),
        CanonicalLabel::new(OS_SOLARIS, &[OS_SOLARIS]),
        CanonicalLabel::new(OS_OPENBSD, &[OS_OPENBSD]),
    ]
}

pub fn builtin_arch_labels() -> Vec<CanonicalLabel> {
    vec![
        CanonicalLabel::new(ARCH_X86_64, &[ARCH_X86_64, "amd64", "64bit", "x64"]),
        CanonicalLabel::new(ARCH_ARM64, &[ARCH_ARM64, "aarch64"]),
        CanonicalLabel::new(ARCH_ARM, &[ARCH_ARM, "armhf", "armv7", "armv7hl"]),
        CanonicalLabel::new(ARCH_386, &[ARCH_386, "i686", "x86", "i386", "32bit"]),
        CanonicalLabel::new(ARCH_RISCV64, &[ARCH_RISCV64]),
        CanonicalLabel::new(ARCH_S390X, &[ARCH_S390X]),
        // IBM Power: redhat and debian spellings
        CanonicalLabel::new(ARCH_PPC64LE, &[ARCH_PPC64LE, "ppc64el", "ppc64"]),
    ]
}
