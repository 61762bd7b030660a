//! Iterative walks over the folder hierarchy.
//!
//! Every walk keeps an explicit stack and fails once it descends more than
//! `max_depth` levels, so a corrupted parent chain cannot loop forever or
//! exhaust the call stack.

use std::collections::{HashMap, HashSet};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_database::{FolderFilter, FolderRepository};
use docvault_entity::folder::Folder;

pub(crate) fn depth_exceeded(max_depth: usize) -> AppError {
    AppError::invalid_state(format!(
        "Folder hierarchy exceeds the maximum depth of {max_depth}"
    ))
}

/// Load `root` and every folder beneath it, in any lifecycle state, in
/// pre-order. Reversing the result yields children before parents.
pub(crate) async fn collect_subtree(
    folders: &dyn FolderRepository,
    root: Folder,
    max_depth: usize,
) -> AppResult<Vec<Folder>> {
    let mut seen = HashSet::from([root.id]);
    let mut ordered = Vec::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((folder, depth)) = stack.pop() {
        if depth > max_depth {
            return Err(depth_exceeded(max_depth));
        }
        let children = folders.find(&FolderFilter::children_of(folder.id)).await?;
        ordered.push(folder);
        for child in children.into_iter().rev() {
            if seen.insert(child.id) {
                stack.push((child, depth + 1));
            }
        }
    }

    Ok(ordered)
}

/// Walk from `start` up the parent chain to the workspace root, returning
/// the folders visited (starting with `start`).
pub(crate) async fn ancestors(
    folders: &dyn FolderRepository,
    start: FolderId,
    max_depth: usize,
) -> AppResult<Vec<Folder>> {
    let mut chain = Vec::new();
    let mut cursor = Some(start);
    while let Some(id) = cursor {
        if chain.len() > max_depth {
            return Err(depth_exceeded(max_depth));
        }
        let Some(folder) = folders.find_by_id(id).await? else {
            break;
        };
        cursor = folder.parent_folder_id;
        chain.push(folder);
    }
    Ok(chain)
}

enum Visit {
    Enter(Folder, usize),
    Exit(Folder, usize),
}

/// Assemble a forest from a flat folder list.
///
/// Nodes are built bottom-up by `make_node(folder, children)`; siblings are
/// ordered by name. Only folders reachable from `root` (`None` = workspace
/// root) appear in the result.
pub(crate) fn build_forest<N>(
    root: Option<FolderId>,
    folders: Vec<Folder>,
    max_depth: usize,
    mut make_node: impl FnMut(Folder, Vec<N>) -> N,
) -> AppResult<Vec<N>> {
    let mut adjacency: HashMap<Option<FolderId>, Vec<Folder>> = HashMap::new();
    for folder in folders {
        adjacency
            .entry(folder.parent_folder_id)
            .or_default()
            .push(folder);
    }
    for siblings in adjacency.values_mut() {
        siblings.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut stack: Vec<Visit> = adjacency
        .remove(&root)
        .unwrap_or_default()
        .into_iter()
        .rev()
        .map(|f| Visit::Enter(f, 1))
        .collect();
    let mut built: Vec<N> = Vec::new();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(folder, depth) => {
                if depth > max_depth {
                    return Err(depth_exceeded(max_depth));
                }
                let children = adjacency.remove(&Some(folder.id)).unwrap_or_default();
                stack.push(Visit::Exit(folder, children.len()));
                stack.extend(
                    children
                        .into_iter()
                        .rev()
                        .map(|child| Visit::Enter(child, depth + 1)),
                );
            }
            Visit::Exit(folder, child_count) => {
                let children = built.split_off(built.len() - child_count);
                built.push(make_node(folder, children));
            }
        }
    }

    Ok(built)
}
