//! Import rewriting for registry payloads
//!
//! Registry files import shared code through canonical paths (`@/lib/utils`,
//! `@/hooks/<name>`). Before a file is written or compared, those references
//! are rewritten to the project's configured aliases. Only `from '<path>'`
//! references to the two canonical roots are touched; relative imports and
//! all other text pass through unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::{Aliases, ProjectConfig};

/// `from '@/lib/utils'` or `from '@/hooks/<name>'`, either quote style
static CANONICAL_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"from(\s+)(['"])@/(?:lib/utils|hooks/([\w-]+))(['"])"#)
        .expect("valid canonical import pattern")
});

/// Rewrite canonical import references to the configured aliases
///
/// Both rules run in a single pass, so text produced by one rule is never
/// rewritten again by the other.
pub fn transform(content: &str, config: &ProjectConfig) -> String {
    let aliases = &config.aliases;

    CANONICAL_IMPORT
        .replace_all(content, |caps: &Captures| {
            let path = match caps.get(3) {
                Some(hook) => format!("{}/{}", aliases.hooks, hook.as_str()),
                None => aliases.utils.clone(),
            };
            format!("from{}{}{}{}", &caps[1], &caps[2], path, &caps[4])
        })
        .into_owned()
}

/// Alias key whose rewritten imports would be rewritten again on a second pass
///
/// This happens when an alias points back into a canonical root, e.g. a hooks
/// alias of `@/lib` turns `@/hooks/utils` into `@/lib/utils`.
pub fn unstable_alias(aliases: &Aliases) -> Option<&'static str> {
    let config = ProjectConfig {
        aliases: aliases.clone(),
        ..ProjectConfig::default()
    };
    let rewritten = [
        ("aliases.utils", format!("from '{}'", aliases.utils)),
        ("aliases.hooks", format!("from '{}/utils'", aliases.hooks)),
    ];

    rewritten
        .into_iter()
        .find(|(_, text)| transform(text, &config) != *text)
        .map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(utils: &str, hooks: &str) -> ProjectConfig {
        ProjectConfig {
            schema: None,
            tsx: true,
            aliases: Aliases {
                components: "@/components".to_string(),
                utils: utils.to_string(),
                hooks: hooks.to_string(),
            },
        }
    }

    const SOURCE: &str = r#"import { View } from '@tarojs/components'
import { cn } from '@/lib/utils'
import { useId } from "@/hooks/use-id"
import type { Disclosure } from '@/hooks/use-disclosure'
import { Popup } from './popup'
// see @/lib/utils for cn
"#;

    #[test]
    fn test_rewrites_utils_and_hooks() {
        let out = transform(SOURCE, &config("~/shared/cn", "~/composables"));

        assert_eq!(
            out,
            r#"import { View } from '@tarojs/components'
import { cn } from '~/shared/cn'
import { useId } from "~/composables/use-id"
import type { Disclosure } from '~/composables/use-disclosure'
import { Popup } from './popup'
// see @/lib/utils for cn
"#
        );
    }

    #[test]
    fn test_default_aliases_leave_content_unchanged() {
        assert_eq!(transform(SOURCE, &config("@/lib/utils", "@/hooks")), SOURCE);
    }

    #[test]
    fn test_no_matches_returned_unchanged() {
        let text = "export const answer = 42\n";
        assert_eq!(transform(text, &config("~/u", "~/h")), text);
        assert_eq!(transform("", &config("~/u", "~/h")), "");
    }

    #[test]
    fn test_nested_hook_paths_untouched() {
        let text = "import { x } from '@/hooks/internal/x'\n";
        assert_eq!(transform(text, &config("~/u", "~/h")), text);
    }

    #[test]
    fn test_transform_is_idempotent() {
        for cfg in [
            config("~/shared/cn", "~/composables"),
            config("@/lib/utils", "@/hooks"),
            config("@/lib/utils/cn", "@/hooks/custom"),
        ] {
            let once = transform(SOURCE, &cfg);
            assert_eq!(transform(&once, &cfg), once);
        }
    }

    #[test]
    fn test_aliases_pointing_into_canonical_roots() {
        let hooks_in_lib = config("~/u", "@/lib");
        let once = transform("import { x } from '@/hooks/utils'\n", &hooks_in_lib);
        assert_ne!(transform(&once, &hooks_in_lib), once);
        assert_eq!(unstable_alias(&hooks_in_lib.aliases), Some("aliases.hooks"));

        let utils_in_hooks = config("@/hooks/cn", "~/h");
        assert_eq!(unstable_alias(&utils_in_hooks.aliases), Some("aliases.utils"));

        assert_eq!(unstable_alias(&config("@/lib/utils", "@/hooks").aliases), None);
        assert_eq!(unstable_alias(&config("@/lib/utils", "@/lib").aliases), None);
        assert_eq!(unstable_alias(&config("~/shared/cn", "~/composables").aliases), None);
    }
}
