//! To-do list shown by the desk overlay.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::library::scroll_clamped;

pub const TODO_VISIBLE_ROWS: usize = 5;
/// Longest task text accepted from the input buffer, in characters.
pub const TODO_INPUT_LIMIT: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoTask {
    pub task: String,
    pub completed: bool,
}

impl TodoTask {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            completed: false,
        }
    }
}

#[derive(Component, Clone, Debug, Default)]
pub struct TodoListData {
    pub tasks: Vec<TodoTask>,
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub is_showing_ui: bool,
    pub is_adding_new: bool,
    pub input_buffer: String,
}

impl TodoListData {
    pub fn new(tasks: Vec<TodoTask>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    pub fn default_tasks() -> Vec<TodoTask> {
        vec![
            TodoTask::new("Complete project setup"),
            TodoTask::new("Read documentation"),
            TodoTask::new("Practice coding"),
        ]
    }

    /// Flip the completed flag. Returns false for an out of range index.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    pub fn begin_adding(&mut self) {
        self.is_adding_new = true;
        self.input_buffer.clear();
    }

    pub fn cancel_adding(&mut self) {
        self.is_adding_new = false;
        self.input_buffer.clear();
    }

    pub fn push_char(&mut self, c: char) {
        if !c.is_control() && self.input_buffer.chars().count() < TODO_INPUT_LIMIT {
            self.input_buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.input_buffer.pop();
    }

    /// Commit the input buffer as a new task. Blank input is rejected and
    /// keeps the editor open.
    pub fn commit_input(&mut self) -> bool {
        let text = self.input_buffer.trim();
        if text.is_empty() {
            return false;
        }
        self.tasks.push(TodoTask::new(text));
        self.cancel_adding();
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<TodoTask> {
        if index >= self.tasks.len() {
            return None;
        }
        let removed = self.tasks.remove(index);
        let max = self.tasks.len().saturating_sub(TODO_VISIBLE_ROWS);
        self.scroll_offset = self.scroll_offset.min(max);
        match self.selected {
            Some(sel) if sel == index => self.selected = None,
            Some(sel) if sel > index => self.selected = Some(sel - 1),
            _ => {}
        }
        Some(removed)
    }

    pub fn scroll_by(&mut self, wheel: f32) {
        let max = self.tasks.len().saturating_sub(TODO_VISIBLE_ROWS);
        self.scroll_offset = scroll_clamped(self.scroll_offset, wheel, max);
    }

    pub fn close(&mut self) {
        self.is_showing_ui = false;
        self.is_adding_new = false;
    }
}
