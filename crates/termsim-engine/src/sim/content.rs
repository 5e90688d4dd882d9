//! Content-display simulator (`cat`) and the working-directory commands.

use termsim_vfs::VirtualFs;

use crate::invocation::InvocationState;

/// `cat`: print a file's stored content.
pub fn simulate(state: &InvocationState, fs: &VirtualFs) -> String {
    let Some(operand) = state.nonempty_input("path") else {
        return "cat: missing file operand".to_string();
    };
    let target = fs.resolve(operand);
    let Some(node) = fs.stat(&target) else {
        return format!("cat: {operand}: No such file or directory");
    };
    if node.is_dir() {
        return format!("cat: {operand}: Is a directory");
    }
    match node.content.as_deref() {
        Some(content) if !content.is_empty() => content.trim_end_matches('\n').to_string(),
        _ => format!("cat: {operand}: file is empty"),
    }
}

/// `cd`: move the working-directory cursor. The only mutation of the cursor
/// in the whole engine.
pub fn change_directory(state: &InvocationState, fs: &mut VirtualFs) -> String {
    let Some(operand) = state.nonempty_input("path") else {
        return "cd: missing directory operand".to_string();
    };
    let target = fs.resolve(operand);
    match fs.stat(&target) {
        None => format!("cd: {operand}: No such file or directory"),
        Some(node) if node.is_file() => format!("cd: {operand}: Not a directory"),
        Some(_) => {
            fs.set_cursor(target);
            String::new()
        },
    }
}
