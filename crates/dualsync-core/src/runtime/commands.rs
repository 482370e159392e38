//! Package-manager command table

use super::process::Invocation;
use crate::stack::PackageManager;

/// Install every dependency declared in `package.json`
pub fn install(pm: PackageManager) -> Invocation {
    match pm {
        PackageManager::Npm => Invocation::new("npm", ["install"]),
        PackageManager::Yarn => Invocation::new("yarn", Vec::<String>::new()),
        PackageManager::Pnpm => Invocation::new("pnpm", ["install"]),
        PackageManager::Bun => Invocation::new("bun", ["install"]),
        PackageManager::Deno => Invocation::new("deno", ["install"]),
    }
}

/// Add packages, as dev dependencies when `dev` is set.
///
/// deno has no dev flag, so dev packages are added as regular ones.
pub fn add<S: AsRef<str>>(pm: PackageManager, packages: &[S], dev: bool) -> Invocation {
    let (program, verb, dev_flag) = match pm {
        PackageManager::Npm => ("npm", "install", Some("-D")),
        PackageManager::Yarn => ("yarn", "add", Some("-D")),
        PackageManager::Pnpm => ("pnpm", "add", Some("-D")),
        PackageManager::Bun => ("bun", "add", Some("-d")),
        PackageManager::Deno => ("deno", "add", None),
    };

    let mut args = vec![verb.to_string()];
    if dev {
        if let Some(flag) = dev_flag {
            args.push(flag.to_string());
        }
    }
    args.extend(packages.iter().map(|p| p.as_ref().to_string()));
    Invocation::new(program, args)
}

/// Start the dev server
pub fn dev(pm: PackageManager) -> Invocation {
    match pm {
        PackageManager::Npm => Invocation::new("npm", ["run", "dev"]),
        PackageManager::Yarn => Invocation::new("yarn", ["dev"]),
        PackageManager::Pnpm => Invocation::new("pnpm", ["dev"]),
        PackageManager::Bun => Invocation::new("bun", ["run", "dev"]),
        PackageManager::Deno => Invocation::new("deno", ["task", "dev"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_commands() {
        let rendered: Vec<String> = PackageManager::ALL
            .iter()
            .map(|pm| install(*pm).to_string())
            .collect();
        assert_eq!(
            rendered,
            vec![
                "npm install",
                "yarn",
                "pnpm install",
                "bun install",
                "deno install"
            ]
        );
    }

    #[test]
    fn test_add_production_and_dev() {
        let pkgs = ["zod", "axios"];
        assert_eq!(
            add(PackageManager::Npm, &pkgs, false).to_string(),
            "npm install zod axios"
        );
        assert_eq!(
            add(PackageManager::Npm, &pkgs, true).to_string(),
            "npm install -D zod axios"
        );
        assert_eq!(
            add(PackageManager::Yarn, &pkgs, true).to_string(),
            "yarn add -D zod axios"
        );
        assert_eq!(
            add(PackageManager::Pnpm, &pkgs, true).to_string(),
            "pnpm add -D zod axios"
        );
        assert_eq!(
            add(PackageManager::Bun, &pkgs, true).to_string(),
            "bun add -d zod axios"
        );
    }

    #[test]
    fn test_deno_add_ignores_dev_flag() {
        assert_eq!(
            add(PackageManager::Deno, &["zod"], true).to_string(),
            "deno add zod"
        );
    }

    #[test]
    fn test_dev_commands() {
        assert_eq!(dev(PackageManager::Npm).to_string(), "npm run dev");
        assert_eq!(dev(PackageManager::Yarn).to_string(), "yarn dev");
        assert_eq!(dev(PackageManager::Pnpm).to_string(), "pnpm dev");
        assert_eq!(dev(PackageManager::Bun).to_string(), "bun run dev");
        assert_eq!(dev(PackageManager::Deno).to_string(), "deno task dev");
    }
}
