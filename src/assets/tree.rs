//=======================================================================//
// IMPORTS
//
//=======================================================================//

use std::path::{Component, Path};

use hashbrown::HashMap;

use crate::macros::return_if_none;

//=======================================================================//
// TYPES
//
//=======================================================================//

/// A directory in a [`LibraryTree`]: its subdirectories plus the file names directly inside it,
/// kept alphabetically sorted for the asset browser UI this core feeds.
#[must_use]
#[derive(Debug, Default, Clone)]
pub struct TreeDir
{
    pub dirs:  HashMap<String, TreeDir>,
    pub files: Vec<String>
}

impl TreeDir
{
    #[inline]
    fn insert_sorted(&mut self, file_name: String)
    {
        if let Err(index) = self.files.binary_search(&file_name)
        {
            self.files.insert(index, file_name);
        }
    }

    #[inline]
    fn remove_file(&mut self, file_name: &str) -> bool
    {
        match self.files.binary_search(&file_name.to_owned())
        {
            Ok(index) =>
            {
                self.files.remove(index);
                true
            },
            Err(_) => false
        }
    }

    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool { self.dirs.is_empty() && self.files.is_empty() }
}

//=======================================================================//

/// A trie-like directory tree mirroring the paths known to an
/// [`AssetLibrary`](crate::assets::library::AssetLibrary), used by the asset browser UI this core
/// feeds. Empty directories are pruned as soon as their last file is removed.
#[must_use]
#[derive(Debug, Default, Clone)]
pub struct LibraryTree
{
    root: TreeDir
}

impl LibraryTree
{
    /// Splits `path` into its directory components and final file name.
    #[inline]
    fn components(path: &Path) -> (Vec<String>, Option<String>)
    {
        let mut dirs = Vec::new();
        let mut file = None;

        for component in path.components()
        {
            if let Component::Normal(part) = component
            {
                if file.is_some()
                {
                    dirs.push(file.take().unwrap());
                }

                file = Some(part.to_string_lossy().into_owned());
            }
        }

        (dirs, file)
    }

    /// Registers `path`'s file name under its parent directory chain, creating directories as
    /// needed.
    #[inline]
    pub fn insert(&mut self, path: &Path)
    {
        let (dirs, file) = Self::components(path);
        let file = return_if_none!(file);

        let mut node = &mut self.root;
        for dir in dirs
        {
            node = node.dirs.entry(dir).or_default();
        }

        node.insert_sorted(file);
    }

    /// Removes `path`'s file name from its parent directory, pruning any directory left empty as a
    /// result, all the way up to the root.
    #[inline]
    pub fn remove(&mut self, path: &Path)
    {
        let (dirs, file) = Self::components(path);
        let file = return_if_none!(file);

        Self::remove_recursive(&mut self.root, &dirs, &file);
    }

    #[inline]
    fn remove_recursive(node: &mut TreeDir, dirs: &[String], file: &str) -> bool
    {
        match dirs.split_first()
        {
            Some((head, rest)) =>
            {
                let child = return_if_none!(node.dirs.get_mut(head), false);

                if Self::remove_recursive(child, rest, file) && child.is_empty()
                {
                    node.dirs.remove(head);
                }
            },
            None =>
            {
                node.remove_file(file);
            }
        }

        node.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &TreeDir { &self.root }
}

//=======================================================================//
// TESTS
//
//=======================================================================//
