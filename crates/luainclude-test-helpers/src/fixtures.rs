//! Test fixtures - Lua script snippets for testing

use indoc::indoc;

use crate::tree::ScriptTree;

/// A script with no include directive
pub fn plain_script() -> &'static str {
    indoc! {r#"
        local current = redis.call('GET', KEYS[1])
        return current
    "#}
}

/// Shared helper functions included by other scripts
pub fn helpers_script() -> &'static str {
    indoc! {r#"
        local function incr(key, by)
            return redis.call('INCRBY', key, by)
        end
    "#}
}

/// A rate limiter that includes the helpers
pub fn ratelimit_script() -> &'static str {
    indoc! {r#"
        #include "helpers"
        local count = incr(KEYS[1], 1)
        if count > tonumber(ARGV[1]) then
            return 0
        end
        return 1
    "#}
}

/// Lay out a small script tree:
///
/// ```text
/// test.lua           includes "test2" and 'subdir/test3'
/// test2.lua          plain
/// subdir/test3.lua   includes "../test2"
/// subdir/notes.txt   ignored by directory loads
/// ```
pub fn sample_tree() -> ScriptTree {
    let tree = ScriptTree::new();
    tree.write(
        "test.lua",
        indoc! {r#"
            -- entry point
            #include "test2"
            #include 'subdir/test3'
            return test2() + test3()
        "#},
    );
    tree.write(
        "test2.lua",
        indoc! {r#"
            local function test2() return 2 end
        "#},
    );
    tree.write(
        "subdir/test3.lua",
        indoc! {r#"
            #include "../test2"
            local function test3() return test2() + 1 end
        "#},
    );
    tree.write("subdir/notes.txt", "not a script\n");
    tree
}
