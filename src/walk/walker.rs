//! InteractiveWalker - prompts for each path and applies the chosen action

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{AddMode, CategoryConfig, ClassifiedIndex};
use crate::error::{Error, Result};
use crate::prompt::Prompt;

use super::choice::{Action, Choice, build_choices};
use super::config::WalkOptions;
use super::depth::DepthTracker;
use super::filter::{is_eligible, is_ignored};
use super::queue::{QueueItem, TraversalQueue};

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// The queue was drained.
    Completed,
    /// The user chose Exit.
    Halted,
}

/// Outcome of one interactive walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkReport {
    pub status: WalkStatus,
    /// Number of paths the user was prompted for
    pub processed: usize,
    /// Whether any category assignment changed the config
    pub config_changed: bool,
    /// Depth when the walk stopped
    pub final_depth: usize,
}

impl WalkReport {
    /// Process exit code for this outcome. Halting is not a failure.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            WalkStatus::Completed | WalkStatus::Halted => 0,
        }
    }
}

/// State threaded through one walk.
struct TraversalContext<'a> {
    depth: DepthTracker,
    queue: TraversalQueue,
    categories: &'a [String],
    config: &'a mut CategoryConfig,
    processed: usize,
    config_changed: bool,
}

impl TraversalContext<'_> {
    fn report(&self, status: WalkStatus) -> WalkReport {
        WalkReport {
            status,
            processed: self.processed,
            config_changed: self.config_changed,
            final_depth: self.depth.current(),
        }
    }
}

/// Walks paths interactively, asking a `Prompt` what to do with each one.
pub struct InteractiveWalker {
    options: WalkOptions,
    classified: ClassifiedIndex,
}

impl InteractiveWalker {
    pub fn new(options: WalkOptions) -> Self {
        Self {
            options,
            classified: ClassifiedIndex::new(),
        }
    }

    /// Skip every path already classified in a previous config snapshot.
    pub fn with_classified(mut self, classified: ClassifiedIndex) -> Self {
        self.classified = classified;
        self
    }

    /// Walk from `roots`, assigning paths in `config` to `categories`.
    pub fn walk<P: Prompt>(
        &self,
        config: &mut CategoryConfig,
        categories: &[String],
        roots: &[PathBuf],
        prompt: &mut P,
    ) -> Result<WalkReport> {
        info!(
            multi = self.options.multi_category,
            max_depth = ?self.options.max_depth,
            include_symlinks = self.options.include_symlinks,
            roots = roots.len(),
            "starting interactive walk"
        );
        let mut ctx = TraversalContext {
            depth: DepthTracker::new(self.options.max_depth),
            queue: TraversalQueue::seeded(roots.iter().cloned()),
            categories,
            config,
            processed: 0,
            config_changed: false,
        };

        while let Some(item) = ctx.queue.pop_front() {
            let path = match item {
                QueueItem::DepthMarker => {
                    ctx.depth.ascend();
                    debug!(depth = ctx.depth.current(), "left directory");
                    continue;
                }
                QueueItem::Path(path) => path,
            };

            if let Some(existing) = self.classified.get(&path) {
                info!(
                    path = %path.display(),
                    categories = %existing.join(", "),
                    "skipping path already in configuration"
                );
                continue;
            }
            if !is_eligible(&path, self.options.include_symlinks) {
                continue;
            }

            ctx.processed += 1;
            match self.choose_action(&ctx, &path, prompt)? {
                Action::Exit => {
                    info!("exit action");
                    return Ok(ctx.report(WalkStatus::Halted));
                }
                Action::StepInto => self.step_into(&mut ctx, &path),
                Action::StepOut => {
                    let discarded = ctx.queue.discard_until_marker();
                    info!(discarded, "step-out action");
                }
                Action::Skip => debug!(path = %path.display(), "skip action"),
                Action::CategorySelected(selected) => {
                    info!(
                        path = %path.display(),
                        categories = %selected.join(", "),
                        "adding path to categories"
                    );
                    ctx.config_changed |= ctx.config.add_path(&path, &selected, AddMode::Tolerant)?;
                }
            }
        }

        if ctx.processed == 0 {
            warn!("no items were actually processed");
        }
        Ok(ctx.report(WalkStatus::Completed))
    }

    /// Offer the menu for `path` and turn the answer into an action.
    fn choose_action<P: Prompt>(
        &self,
        ctx: &TraversalContext<'_>,
        path: &Path,
        prompt: &mut P,
    ) -> Result<Action> {
        let can_step_into = path.is_dir() && ctx.depth.can_descend();
        let can_step_out = ctx.depth.current() > 0;
        let choices = build_choices(
            ctx.categories,
            self.options.multi_category,
            can_step_into,
            can_step_out,
        );
        let labels: Vec<String> = choices.iter().map(Choice::label).collect();
        let default = choices.iter().position(|c| *c == Choice::Skip);

        let message = format!("\"{}\" - select an action:", path.display());
        let index = prompt.select(&message, &labels, default)?;
        let choice = choices
            .get(index)
            .ok_or_else(|| Error::InvalidAction(format!("choice #{} of {}", index, choices.len())))?;

        let action = match choice {
            Choice::Category(name) => Action::CategorySelected(vec![name.clone()]),
            Choice::PickCategories => {
                let picked = prompt.multi_select("Pick categories", ctx.categories)?;
                let selected = picked
                    .into_iter()
                    .map(|i| {
                        ctx.categories.get(i).cloned().ok_or_else(|| {
                            Error::InvalidAction(format!(
                                "category #{} of {}",
                                i,
                                ctx.categories.len()
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                if selected.is_empty() {
                    Action::Skip
                } else {
                    Action::CategorySelected(selected)
                }
            }
            Choice::Skip => Action::Skip,
            Choice::StepInto => Action::StepInto,
            Choice::StepOut => Action::StepOut,
            Choice::Exit => Action::Exit,
        };
        Ok(action)
    }

    /// Queue the children of `dir` ahead of a depth marker and descend.
    fn step_into(&self, ctx: &mut TraversalContext<'_>, dir: &Path) {
        info!(path = %dir.display(), "step-into action");
        if !ctx.depth.can_descend() {
            warn!(path = %dir.display(), "maximum depth reached, not stepping in");
            return;
        }
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "cannot list directory, skipping");
                return;
            }
        };

        let mut children: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| !is_ignored(p, &self.options.ignore_patterns))
            .collect();
        children.sort();

        ctx.queue.push_front(QueueItem::DepthMarker);
        ctx.queue
            .push_front_many(children.into_iter().map(QueueItem::Path), true);
        ctx.depth.descend();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedPrompt, TestTree};

    fn cats() -> Vec<String> {
        vec!["docs".to_string(), "music".to_string()]
    }

    /// `/r` with `a.txt`, `sub/b.txt` and `link -> a.txt`.
    fn sample_tree() -> TestTree {
        let tree = TestTree::new();
        tree.add_file("a.txt", "a");
        tree.add_file("sub/b.txt", "b");
        tree.add_symlink("link", "a.txt");
        tree
    }

    #[test]
    fn test_walk_visits_children_after_step_into() {
        let tree = sample_tree();
        let mut prompt = ScriptedPrompt::new(["Skip", "Step-into", "Skip"]);
        let mut config = CategoryConfig::new();

        let report = InteractiveWalker::new(WalkOptions::default())
            .walk(&mut config, &cats(), &tree.children(), &mut prompt)
            .unwrap();

        assert_eq!(
            prompt.prompted_paths(),
            vec![
                tree.path().join("a.txt"),
                tree.path().join("sub"),
                tree.path().join("sub/b.txt"),
            ]
        );
        assert_eq!(report.status, WalkStatus::Completed);
        assert_eq!(report.processed, 3);
        assert_eq!(report.final_depth, 0);
        assert!(!report.config_changed);
    }

    #[test]
    fn test_exit_halts_before_pending_marker() {
        let tree = sample_tree();
        let mut prompt = ScriptedPrompt::new(["Skip", "Step-into", "Exit"]);
        let mut config = CategoryConfig::new();

        let report = InteractiveWalker::new(WalkOptions::default())
            .walk(&mut config, &cats(), &tree.children(), &mut prompt)
            .unwrap();

        assert_eq!(report.status, WalkStatus::Halted);
        assert_eq!(report.final_depth, 1, "marker for sub/ must not be consumed");
        assert_eq!(prompt.prompted_paths().len(), 3);
    }

    #[test]
    fn test_category_choice_updates_config() {
        let tree = sample_tree();
        let mut prompt = ScriptedPrompt::new(["Category \"docs\"", "Category \"music\""]);
        let mut config = CategoryConfig::new();

        let report = InteractiveWalker::new(WalkOptions::default())
            .walk(&mut config, &cats(), &tree.children(), &mut prompt)
            .unwrap();

        assert!(report.config_changed);
        assert_eq!(config.paths("docs"), &[tree.path().join("a.txt")]);
        assert_eq!(config.paths("music"), &[tree.path().join("sub")]);
    }

    #[test]
    fn test_duplicate_add_is_tolerated() {
        let tree = sample_tree();
        let a = tree.path().join("a.txt");
        let mut config = CategoryConfig::new();
        config.add_path(&a, &["docs".to_string()], AddMode::Strict).unwrap();
        let mut prompt = ScriptedPrompt::new(["Category \"docs\""]);

        let report = InteractiveWalker::new(WalkOptions::default())
            .walk(&mut config, &cats(), &[a.clone()], &mut prompt)
            .unwrap();

        assert!(!report.config_changed);
        assert_eq!(config.paths("docs"), &[a]);
    }

    #[test]
    fn test_multi_category_selection() {
        let tree = sample_tree();
        let a = tree.path().join("a.txt");
        let mut prompt = ScriptedPrompt::new(["Choose categories"]).with_multi(vec![vec![
            "music".to_string(),
            "docs".to_string(),
        ]]);
        let mut config = CategoryConfig::new();
        let options = WalkOptions {
            multi_category: true,
            ..Default::default()
        };

        InteractiveWalker::new(options)
            .walk(&mut config, &cats(), &[a.clone()], &mut prompt)
            .unwrap();

        assert_eq!(config.paths("docs"), &[a.clone()]);
        assert_eq!(config.paths("music"), &[a]);
        assert_eq!(config.category_names(), vec!["music", "docs"]);
    }

    #[test]
    fn test_empty_multi_select_is_skip() {
        let tree = sample_tree();
        let mut prompt = ScriptedPrompt::new(["Choose categories"]).with_multi(vec![vec![]]);
        let mut config = CategoryConfig::new();
        let options = WalkOptions {
            multi_category: true,
            ..Default::default()
        };

        let report = InteractiveWalker::new(options)
            .walk(&mut config, &cats(), &[tree.path().join("a.txt")], &mut prompt)
            .unwrap();

        assert!(!report.config_changed);
        assert!(config.is_empty());
    }

    #[test]
    fn test_step_out_discards_only_current_directory() {
        let tree = TestTree::new();
        tree.add_file("d/x.txt", "x");
        tree.add_file("d/y.txt", "y");
        tree.add_file("d/z.txt", "z");
        tree.add_file("e.txt", "e");
        let mut prompt = ScriptedPrompt::new(["Step-into", "Step-out"]);
        let mut config = CategoryConfig::new();

        let report = InteractiveWalker::new(WalkOptions::default())
            .walk(&mut config, &cats(), &tree.children(), &mut prompt)
            .unwrap();

        assert_eq!(
            prompt.prompted_paths(),
            vec![
                tree.path().join("d"),
                tree.path().join("d/x.txt"),
                tree.path().join("e.txt"),
            ]
        );
        assert_eq!(report.final_depth, 0);
    }

    #[test]
    fn test_nested_step_into_restores_depth() {
        let tree = TestTree::new();
        tree.add_file("a/b/c/leaf.txt", "leaf");
        tree.add_file("after.txt", "after");
        let mut prompt = ScriptedPrompt::new(["Step-into", "Step-into", "Step-into", "Step-out"]);
        let mut config = CategoryConfig::new();

        let report = InteractiveWalker::new(WalkOptions::default())
            .walk(&mut config, &cats(), &tree.children(), &mut prompt)
            .unwrap();

        // Step-out at depth 3 drops nothing else; markers bring depth back to 0
        assert_eq!(report.final_depth, 0);
        assert_eq!(prompt.prompted_paths().last(), Some(&tree.path().join("after.txt")));
        let step_out_offered = prompt
            .transcript()
            .iter()
            .find(|entry| entry.path == tree.path().join("after.txt"))
            .map(|entry| entry.labels.contains(&"Step-out".to_string()));
        assert_eq!(step_out_offered, Some(false));
    }

    #[test]
    fn test_classified_paths_are_never_prompted() {
        let tree = sample_tree();
        let mut classified = ClassifiedIndex::new();
        classified.insert(tree.path().join("a.txt"), vec!["docs".to_string()]);
        classified.insert(tree.path().join("sub"), vec!["music".to_string()]);
        let mut prompt = ScriptedPrompt::new(Vec::<&str>::new());
        let mut config = CategoryConfig::new();

        let report = InteractiveWalker::new(WalkOptions::default())
            .with_classified(classified)
            .walk(&mut config, &cats(), &tree.children(), &mut prompt)
            .unwrap();

        assert!(prompt.prompted_paths().is_empty());
        assert_eq!(report.processed, 0);
        assert_eq!(report.status, WalkStatus::Completed);
    }

    #[test]
    fn test_symlinks_offered_only_when_included() {
        let tree = sample_tree();
        let link = tree.path().join("link");

        let mut prompt = ScriptedPrompt::new(Vec::<&str>::new());
        InteractiveWalker::new(WalkOptions::default())
            .walk(&mut CategoryConfig::new(), &cats(), &tree.children(), &mut prompt)
            .unwrap();
        assert!(!prompt.prompted_paths().contains(&link));

        let mut prompt = ScriptedPrompt::new(Vec::<&str>::new());
        let options = WalkOptions {
            include_symlinks: true,
            ..Default::default()
        };
        InteractiveWalker::new(options)
            .walk(&mut CategoryConfig::new(), &cats(), &tree.children(), &mut prompt)
            .unwrap();
        assert!(prompt.prompted_paths().contains(&link));
    }

    #[test]
    fn test_exit_code_is_zero_when_halted() {
        let tree = sample_tree();
        let mut prompt = ScriptedPrompt::new(["Exit"]);
        let report = InteractiveWalker::new(WalkOptions::default())
            .walk(&mut CategoryConfig::new(), &cats(), &tree.children(), &mut prompt)
            .unwrap();
        assert_eq!(report.status, WalkStatus::Halted);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_step_into_symlinked_directory() {
        let tree = sample_tree();
        let sublink = tree.add_symlink("sublink", "sub");
        let mut prompt = ScriptedPrompt::new(["Step-into", "Category \"music\""]);
        let options = WalkOptions {
            include_symlinks: true,
            ..Default::default()
        };
        let mut config = CategoryConfig::new();

        let report = InteractiveWalker::new(options)
            .walk(&mut config, &cats(), &[sublink.clone()], &mut prompt)
            .unwrap();

        assert!(prompt.transcript()[0].labels.contains(&"Step-into".to_string()));
        assert_eq!(prompt.prompted_paths(), vec![sublink.clone(), sublink.join("b.txt")]);
        assert_eq!(config.paths("music"), &[sublink.join("b.txt")]);
        assert_eq!(report.final_depth, 0);
    }

    #[test]
    fn test_max_depth_one_limits_step_into() {
        let tree = TestTree::new();
        tree.add_file("top/inner/deep.txt", "deep");
        let mut prompt = ScriptedPrompt::new(["Step-into"]);

        InteractiveWalker::new(WalkOptions::no_recurse())
            .walk(
                &mut CategoryConfig::new(),
                &cats(),
                &[tree.path().to_path_buf()],
                &mut prompt,
            )
            .unwrap();

        let transcript = prompt.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].path, tree.path());
        assert!(transcript[0].labels.contains(&"Step-into".to_string()));
        assert_eq!(transcript[1].path, tree.path().join("top"));
        assert!(!transcript[1].labels.contains(&"Step-into".to_string()));
        assert!(transcript[1].labels.contains(&"Step-out".to_string()));
    }

    #[test]
    fn test_ignore_patterns_drop_children() {
        let tree = TestTree::new();
        tree.add_file("keep.rs", "k");
        tree.add_file("drop.log", "d");
        let mut prompt = ScriptedPrompt::new(["Step-into"]);
        let options = WalkOptions {
            ignore_patterns: vec!["*.log".to_string()],
            ..Default::default()
        };

        InteractiveWalker::new(options)
            .walk(
                &mut CategoryConfig::new(),
                &cats(),
                &[tree.path().to_path_buf()],
                &mut prompt,
            )
            .unwrap();

        assert_eq!(
            prompt.prompted_paths(),
            vec![tree.path().to_path_buf(), tree.path().join("keep.rs")]
        );
    }

    struct OutOfRangePrompt;

    impl Prompt for OutOfRangePrompt {
        fn select(&mut self, _: &str, choices: &[String], _: Option<usize>) -> Result<usize> {
            Ok(choices.len() + 5)
        }

        fn multi_select(&mut self, _: &str, _: &[String]) -> Result<Vec<usize>> {
            Ok(Vec::new())
        }

        fn confirm(&mut self, _: &str, default: bool) -> Result<bool> {
            Ok(default)
        }
    }

    #[test]
    fn test_unknown_selection_is_fatal() {
        let tree = sample_tree();
        let err = InteractiveWalker::new(WalkOptions::default())
            .walk(
                &mut CategoryConfig::new(),
                &cats(),
                &tree.children(),
                &mut OutOfRangePrompt,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAction(_)));
    }
}
