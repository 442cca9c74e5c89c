//! Arrays and structs: value-semantic composites without identity.

use deep_types::Idx;
use deep_value::Value;

use super::Copier;
use crate::CopyError;

impl Copier<'_, '_> {
    pub(super) fn copy_array(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        let Value::Array(items) = value else {
            return Err(self.mismatch(ty, value));
        };
        if items.len() != self.pool().array_len(ty) {
            return Err(self.mismatch(ty, value));
        }
        let elem = self.pool().array_elem(ty);
        let copied = items
            .iter()
            .map(|item| self.copy(elem, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(copied))
    }

    /// Every field is copied, exported or not.
    pub(super) fn copy_struct(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        let Value::Struct(fields) = value else {
            return Err(self.mismatch(ty, value));
        };
        let pool = self.pool();
        let field_types: Vec<Idx> = pool
            .struct_def(ty)
            .map(|def| def.fields.iter().map(|field| field.ty).collect())
            .unwrap_or_default();
        if field_types.len() != fields.len() {
            return Err(self.mismatch(ty, value));
        }

        let copied = field_types
            .iter()
            .zip(fields)
            .map(|(&field_ty, field)| self.copy(field_ty, field))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Struct(copied))
    }
}
