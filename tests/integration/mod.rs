//! Integration tests for the dirsync synchronization engine

mod failure_injection;
mod nested_trees;
